use host::{ActorId, HostServices, PackageId, ProcessLevel, Scenario, ScenarioCommand};
use tracing::info;

use super::reconcile::{
    DialogueAnimationHandle, TeammateHandle, NPC_DIALOGUE_PACKAGE, PLAYER_DIALOGUE_PACKAGE,
};

/// Scripted session exercising both loops: a follower is recruited, two
/// conversations run, the follower streams out and back, and is finally
/// dismissed. Frame numbers assume the default 33 ms frame interval.
pub(crate) struct DemoScenario {
    animation: DialogueAnimationHandle,
    teammate: TeammateHandle,
    player: Option<ActorId>,
    innkeeper: Option<ActorId>,
    follower: Option<ActorId>,
    player_dialogue: Option<PackageId>,
    npc_dialogue: Option<PackageId>,
}

impl DemoScenario {
    pub(crate) fn new(animation: DialogueAnimationHandle, teammate: TeammateHandle) -> Self {
        Self {
            animation,
            teammate,
            player: None,
            innkeeper: None,
            follower: None,
            player_dialogue: None,
            npc_dialogue: None,
        }
    }

    fn set_package(
        &self,
        host: &mut HostServices,
        id: Option<ActorId>,
        package: Option<PackageId>,
    ) {
        if let Some(actor) = id.and_then(|id| host.actors.find_actor_mut(id)) {
            actor.package = package;
        }
    }

    fn set_teammate(&self, host: &mut HostServices, id: Option<ActorId>, teammate: bool) {
        if let Some(actor) = id.and_then(|id| host.actors.find_actor_mut(id)) {
            actor.teammate = teammate;
        }
    }

    fn set_loaded(&self, host: &mut HostServices, id: Option<ActorId>, loaded: bool) {
        let Some(id) = id else {
            return;
        };
        if let Some(actor) = host.actors.find_actor_mut(id) {
            actor.loaded = loaded;
        }
        let level = loaded.then_some(ProcessLevel::MiddleHigh);
        host.actors.set_process_level(id, level);
    }
}

impl Scenario for DemoScenario {
    fn setup(&mut self, host: &mut HostServices) {
        self.player_dialogue = Some(host.packages.register(PLAYER_DIALOGUE_PACKAGE));
        self.npc_dialogue = Some(host.packages.register(NPC_DIALOGUE_PACKAGE));

        let player = host.actors.spawn("player");
        host.actors.set_process_level(player, Some(ProcessLevel::High));
        host.actors.set_player(Some(player));
        let innkeeper = host.actors.spawn("innkeeper");
        host.actors
            .set_process_level(innkeeper, Some(ProcessLevel::High));
        let follower = host.actors.spawn("follower");
        host.actors
            .set_process_level(follower, Some(ProcessLevel::MiddleHigh));

        self.player = Some(player);
        self.innkeeper = Some(innkeeper);
        self.follower = Some(follower);
        info!(actor_count = host.actors.actor_count(), "demo_world_ready");
    }

    fn on_frame(&mut self, frame_index: u64, host: &mut HostServices) -> ScenarioCommand {
        match frame_index {
            25 => {
                self.set_teammate(host, self.follower, true);
                info!("follower_recruited");
            }
            80 => {
                self.set_package(host, self.innkeeper, self.npc_dialogue);
                info!("innkeeper_conversation_started");
            }
            140 => {
                self.set_package(host, self.player, self.player_dialogue);
                info!("player_conversation_started");
            }
            250 => {
                self.set_package(host, self.innkeeper, None);
                self.set_package(host, self.player, None);
                info!("conversations_ended");
            }
            310 => {
                self.set_loaded(host, self.follower, false);
                info!("follower_unloaded");
            }
            400 => {
                self.set_loaded(host, self.follower, true);
                info!("follower_reloaded");
            }
            460 => {
                self.set_teammate(host, self.follower, false);
                info!("follower_dismissed");
            }
            520 => {
                self.animation.set_enabled(false);
                info!("idle_loop_disabled_by_script");
            }
            560 => {
                info!(
                    tracked = self.teammate.tracked_count(),
                    "teammate_roster_checked"
                );
            }
            _ => {}
        }
        ScenarioCommand::Continue
    }
}
