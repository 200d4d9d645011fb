//! Per-action handlers that turn one phase of a high-level action into a
//! primitive command
//!
//! Handlers return `None` whenever the step cannot run this tick (nothing to
//! select, order not legal, cap reached); the executor turns that into a
//! no-op.

use tracing::trace;

use super::session::{Phase, SessionState};
use crate::{
    catalog::{SmartAction, Structure},
    command::{Command, SelectPointMode},
    encoder::StateVector,
    observation::{FunctionId, Observation, UnitType},
    spatial::{TargetResolver, transform_offset},
    types::{MINIMAP_CENTER, Point},
};

/// Supply depots stop being built at this count.
pub const SUPPLY_DEPOT_CAP: i64 = 10;

/// Only the first production structure of any kind is built.
pub const PRODUCTION_CAP: i64 = 1;

/// Everything a handler may read or use during one tick.
pub(crate) struct TickContext<'a> {
    pub observation: &'a Observation,
    pub state: &'a StateVector,
    pub session: &'a SessionState,
    pub resolver: &'a mut TargetResolver,
}

/// Dispatch one phase of `action`.
pub(crate) fn dispatch(action: SmartAction, ctx: &mut TickContext<'_>) -> Option<Command> {
    match action {
        SmartAction::DoNothing => None,
        SmartAction::Build(Structure::SupplyDepot) => build_supply_depot(ctx),
        SmartAction::Build(Structure::Refinery) => build_refinery(ctx),
        SmartAction::Build(
            structure @ (Structure::Barracks | Structure::Starport | Structure::Factory),
        ) => build_production(structure, ctx),
        SmartAction::TrainMarine => train_marine(ctx),
        SmartAction::Attack { .. } => attack(action.offset(), ctx),
    }
}

fn select_worker(ctx: &mut TickContext<'_>) -> Option<Command> {
    let target = ctx
        .resolver
        .locate(UnitType::Scv, &ctx.observation.screen_unit_type);
    if target.is_none() {
        trace!("no worker visible to select");
    }
    target.map(|target| Command::SelectPoint {
        mode: SelectPointMode::Select,
        target,
    })
}

/// Build order for `structure` at `target`, if the function is currently legal.
fn build_if_legal(ctx: &TickContext<'_>, structure: Structure, target: Point) -> Option<Command> {
    if !ctx.observation.is_available(structure.function()) {
        trace!(?structure, "build order not legal this tick");
        return None;
    }
    Some(Command::Build {
        structure,
        queued: false,
        target,
    })
}

fn build_supply_depot(ctx: &mut TickContext<'_>) -> Option<Command> {
    match ctx.session.phase {
        Phase::Select => select_worker(ctx),
        Phase::Execute => {
            let count = ctx.state.supply_depots;
            if count >= SUPPLY_DEPOT_CAP {
                return None;
            }
            let origin = ctx.session.command_center?;
            let offset = Point::new(15, -15 + 7 * count as i32);
            let target = transform_offset(origin, offset, ctx.session.orientation);
            build_if_legal(ctx, Structure::SupplyDepot, target)
        }
        Phase::Settle => Some(Command::NoOp),
        Phase::Linger => None,
    }
}

fn build_production(structure: Structure, ctx: &mut TickContext<'_>) -> Option<Command> {
    match ctx.session.phase {
        Phase::Select => select_worker(ctx),
        Phase::Execute => {
            let count = ctx.state.production_structures;
            if count >= PRODUCTION_CAP {
                return None;
            }
            let origin = ctx.session.command_center?;
            let dy = (-30.0 + 11.5 * count as f64).round_ties_even() as i32;
            let target = transform_offset(origin, Point::new(30, dy), ctx.session.orientation);
            build_if_legal(ctx, structure, target)
        }
        Phase::Settle => Some(Command::NoOp),
        Phase::Linger => None,
    }
}

fn build_refinery(ctx: &mut TickContext<'_>) -> Option<Command> {
    match ctx.session.phase {
        Phase::Select => select_worker(ctx),
        Phase::Execute => {
            if ctx.state.production_structures >= PRODUCTION_CAP {
                return None;
            }
            // Same base requirement as the other build orders.
            ctx.session.command_center?;
            let geyser = ctx
                .resolver
                .locate(UnitType::VespeneGeyser, &ctx.observation.screen_unit_type)?;
            build_if_legal(ctx, Structure::Refinery, geyser)
        }
        Phase::Settle => Some(Command::NoOp),
        Phase::Linger => None,
    }
}

fn train_marine(ctx: &mut TickContext<'_>) -> Option<Command> {
    match ctx.session.phase {
        Phase::Select => ctx
            .resolver
            .locate(UnitType::Barracks, &ctx.observation.screen_unit_type)
            .map(|target| Command::SelectPoint {
                mode: SelectPointMode::SelectAllType,
                target,
            }),
        Phase::Execute => ctx
            .observation
            .is_available(FunctionId::TrainMarine)
            .then_some(Command::TrainMarine { queued: true }),
        Phase::Settle => Some(Command::NoOp),
        Phase::Linger => None,
    }
}

fn attack(offset: Point, ctx: &mut TickContext<'_>) -> Option<Command> {
    match ctx.session.phase {
        Phase::Select => ctx
            .observation
            .is_available(FunctionId::SelectArmy)
            .then_some(Command::SelectArmy),
        Phase::Execute => {
            if !ctx.observation.is_available(FunctionId::AttackMinimap) {
                return None;
            }
            Some(Command::AttackMinimap {
                queued: false,
                target: transform_offset(MINIMAP_CENTER, offset, ctx.session.orientation),
            })
        }
        Phase::Settle => Some(Command::NoOp),
        Phase::Linger => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        observation::{FeatureMap, StepType},
        spatial::BaseOrientation,
    };

    fn session(phase: Phase, orientation: BaseOrientation) -> SessionState {
        SessionState {
            pending: None,
            phase,
            orientation,
            command_center: Some(Point::new(40, 40)),
        }
    }

    fn run(
        action: SmartAction,
        observation: &Observation,
        state: &StateVector,
        session: &SessionState,
    ) -> Option<Command> {
        let mut resolver = TargetResolver::new(Some(0));
        let mut ctx = TickContext {
            observation,
            state,
            session,
            resolver: &mut resolver,
        };
        dispatch(action, &mut ctx)
    }

    #[test]
    fn test_do_nothing_never_commands() {
        let obs = Observation::new(StepType::Mid);
        for phase in [Phase::Select, Phase::Execute, Phase::Settle, Phase::Linger] {
            let session = session(phase, BaseOrientation::TopLeft);
            assert_eq!(
                run(SmartAction::DoNothing, &obs, &StateVector::default(), &session),
                None
            );
        }
    }

    #[test]
    fn test_production_build_is_capped() {
        let obs = Observation::new(StepType::Mid).with_available([FunctionId::BuildBarracks]);
        let session = session(Phase::Execute, BaseOrientation::TopLeft);
        let action = SmartAction::Build(Structure::Barracks);

        let none_built = StateVector::default();
        assert_eq!(
            run(action, &obs, &none_built, &session),
            Some(Command::Build {
                structure: Structure::Barracks,
                queued: false,
                target: Point::new(70, 10),
            })
        );

        let one_built = StateVector {
            production_structures: 1,
            ..StateVector::default()
        };
        assert_eq!(run(action, &obs, &one_built, &session), None);
    }

    #[test]
    fn test_production_build_mirrors_for_bottom_right() {
        let obs = Observation::new(StepType::Mid).with_available([FunctionId::BuildFactory]);
        let session = session(Phase::Execute, BaseOrientation::BottomRight);
        let command = run(
            SmartAction::Build(Structure::Factory),
            &obs,
            &StateVector::default(),
            &session,
        );
        assert_eq!(command.and_then(|c| c.target()), Some(Point::new(10, 70)));
    }

    #[test]
    fn test_refinery_targets_a_geyser() {
        let mut screen = FeatureMap::filled(20, 20, 0);
        screen.set(12, 3, UnitType::VespeneGeyser.id());
        let obs = Observation::new(StepType::Mid)
            .with_screen(screen)
            .with_available([FunctionId::BuildRefinery]);
        let session = session(Phase::Execute, BaseOrientation::TopLeft);

        let command = run(
            SmartAction::Build(Structure::Refinery),
            &obs,
            &StateVector::default(),
            &session,
        );
        assert_eq!(
            command,
            Some(Command::Build {
                structure: Structure::Refinery,
                queued: false,
                target: Point::new(12, 3),
            })
        );
    }

    #[test]
    fn test_refinery_without_geyser_is_skipped() {
        let obs = Observation::new(StepType::Mid).with_available([FunctionId::BuildRefinery]);
        let session = session(Phase::Execute, BaseOrientation::TopLeft);
        assert_eq!(
            run(
                SmartAction::Build(Structure::Refinery),
                &obs,
                &StateVector::default(),
                &session
            ),
            None
        );
    }

    #[test]
    fn test_refinery_without_cached_base_is_skipped() {
        let mut screen = FeatureMap::filled(20, 20, 0);
        screen.set(12, 3, UnitType::VespeneGeyser.id());
        let obs = Observation::new(StepType::Mid)
            .with_screen(screen)
            .with_available([FunctionId::BuildRefinery]);
        let session = SessionState {
            command_center: None,
            ..session(Phase::Execute, BaseOrientation::TopLeft)
        };

        assert_eq!(
            run(
                SmartAction::Build(Structure::Refinery),
                &obs,
                &StateVector::default(),
                &session
            ),
            None
        );
    }

    #[test]
    fn test_train_marine_selects_barracks_then_queues() {
        let mut screen = FeatureMap::filled(10, 10, 0);
        screen.set(5, 5, UnitType::Barracks.id());
        let obs = Observation::new(StepType::Mid)
            .with_screen(screen)
            .with_available([FunctionId::TrainMarine]);
        let state = StateVector::default();

        let select = run(
            SmartAction::TrainMarine,
            &obs,
            &state,
            &session(Phase::Select, BaseOrientation::TopLeft),
        );
        assert_eq!(
            select,
            Some(Command::SelectPoint {
                mode: SelectPointMode::SelectAllType,
                target: Point::new(5, 5),
            })
        );

        let train = run(
            SmartAction::TrainMarine,
            &obs,
            &state,
            &session(Phase::Execute, BaseOrientation::TopLeft),
        );
        assert_eq!(train, Some(Command::TrainMarine { queued: true }));
    }

    #[test]
    fn test_attack_targets_offset_from_minimap_centre() {
        let obs = Observation::new(StepType::Mid)
            .with_available([FunctionId::SelectArmy, FunctionId::AttackMinimap]);
        let state = StateVector::default();
        let action = SmartAction::Attack { x: 15, y: -1 };

        assert_eq!(
            run(
                action,
                &obs,
                &state,
                &session(Phase::Select, BaseOrientation::TopLeft)
            ),
            Some(Command::SelectArmy)
        );
        assert_eq!(
            run(
                action,
                &obs,
                &state,
                &session(Phase::Execute, BaseOrientation::TopLeft)
            ),
            Some(Command::AttackMinimap {
                queued: false,
                target: Point::new(47, 31),
            })
        );
        assert_eq!(
            run(
                action,
                &obs,
                &state,
                &session(Phase::Execute, BaseOrientation::BottomRight)
            ),
            Some(Command::AttackMinimap {
                queued: false,
                target: Point::new(17, 33),
            })
        );
    }

    #[test]
    fn test_attack_requires_legal_functions() {
        let obs = Observation::new(StepType::Mid);
        let state = StateVector::default();
        let action = SmartAction::Attack { x: 15, y: 15 };
        for phase in [Phase::Select, Phase::Execute] {
            assert_eq!(
                run(action, &obs, &state, &session(phase, BaseOrientation::TopLeft)),
                None
            );
        }
    }
}
