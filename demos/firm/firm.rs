//! A handful of firms selling into the same market, each run by its own Aspiration engine.
//!
//! Every firm tracks three goals, most important first:
//! - profitability (profit per round, should stay above zero),
//! - equity ratio (retained profits over total assets, should stay above 30%),
//! - market share (should stay above 20%).
//!
//! Each round the market clears, the books are updated, and every firm re-evaluates its
//! strategy by raising an `AspirationDecisionRequested` event. The `AspirationPlugin` handles
//! the rest: it runs the decision, triggers `AspirationActionPicked`, and executes the Action.
use core::time::Duration;

use bevy::{app::ScheduleRunnerPlugin, prelude::*};
use aspiration::prelude::*;

const ROUNDS: u32 = 40;
const BASE_DEMAND: f64 = 300.;
const FIXED_COSTS: f64 = 40.;
const START_ASSETS: f64 = 500.;


/// The levers a firm can pull and the numbers its goals are read from.
#[derive(Component, Clone)]
struct Firm {
    name: &'static str,
    price: GoalReading,
    quality: GoalReading,
    profit: GoalReading,
    equity: GoalReading,
    share: GoalReading,
}

impl Firm {
    fn new(name: &'static str, price: f64, quality: f64, equity: f64) -> Self {
        Self {
            name,
            price: GoalReading::new(price),
            quality: GoalReading::new(quality),
            profit: GoalReading::new(0.),
            equity: GoalReading::new(equity),
            share: GoalReading::new(0.),
        }
    }

    /// How attractive this firm's offer is; market share is split by attractiveness.
    fn attractiveness(&self) -> f64 {
        let price = self.price.get().max(0.1);
        (1. + self.quality.get()).max(0.1) / price
    }

    fn unit_cost(&self) -> f64 {
        1. + 0.5 * self.quality.get()
    }

    fn engine(&self, seed: u64) -> AspirationEngine {
        let equity = self.equity.clone();
        let goals: Vec<Box<dyn GoalVariable>> = vec![
            Box::new(MeasuredGoal::new(self.profit.clone(), 0.).with_step(5.)),
            Box::new(FnGoal::new(move || equity.get() / (START_ASSETS + equity.get().max(0.)), 0.3).with_step(0.01)),
            Box::new(MeasuredGoal::new(self.share.clone(), 0.2).with_step(0.01)),
        ];

        let mut engine = AspirationEngine::with_seed(goals, TieBreakStrategy::Sum, seed);

        let nudge = |reading: &GoalReading, delta: f64, floor: f64| {
            let reading = reading.clone();
            move || {
                let next = (reading.get() + delta).max(floor);
                reading.set(next);
            }
        };

        // Initial guesses only; the engine replaces them with what it observes.
        let registered = [
            engine.add_named_action("RaisePrice", nudge(&self.price, 0.1, 0.1), vec![2, 1, -2]),
            engine.add_named_action("CutPrice", nudge(&self.price, -0.1, 0.1), vec![-1, -1, 3]),
            engine.add_named_action("ImproveQuality", nudge(&self.quality, 0.1, 0.), vec![-1, 0, 2]),
            engine.add_named_action("Economize", nudge(&self.quality, -0.1, 0.), vec![1, 1, -1]),
        ];

        for res in registered {
            if let Err(err) = res {
                bevy::log::error!("{}: could not register an Action - {}", self.name, err);
            }
        }

        engine
    }
}


#[derive(Resource, Default)]
struct Round(u32);


fn setup_market(mut commands: Commands) {
    let firms = [
        Firm::new("Acme", 1.6, 0.5, 120.),
        Firm::new("Bolt", 1.2, 0.2, 40.),
        Firm::new("Crux", 2.4, 1.2, 300.),
    ];

    for (seed, firm) in firms.into_iter().enumerate() {
        let agent = AspirationAgent::new(firm.engine(seed as u64));
        commands.spawn((firm, agent));
    }
}


/// Clears the market for one round and updates every firm's books.
fn clear_market(firms: Query<&Firm>) {
    let total_attractiveness: f64 = firms.iter().map(Firm::attractiveness).sum();
    if total_attractiveness <= 0. {
        return;
    }

    for firm in firms.iter() {
        let share = firm.attractiveness() / total_attractiveness;
        let units = BASE_DEMAND * share;
        let profit = units * (firm.price.get() - firm.unit_cost()) - FIXED_COSTS;

        firm.share.set(share);
        firm.profit.set(profit);
        firm.equity.add(profit);
    }
}


/// Asks every firm to re-evaluate its strategy now that the round's numbers are in.
fn request_decisions(
    firms: Query<Entity, With<AspirationAgent>>,
    mut round: ResMut<Round>,
    mut commands: Commands,
    mut exit: MessageWriter<AppExit>,
) {
    round.0 += 1;
    if round.0 > ROUNDS {
        exit.write(AppExit::Success);
        return;
    }

    for firm in firms.iter() {
        commands.trigger(AspirationDecisionRequested::new(firm));
    }
}


fn report_pick(
    trigger: On<AspirationActionPicked>,
    firms: Query<&Firm>,
    round: Res<Round>,
) {
    let evt = trigger.event();
    let Ok(firm) = firms.get(evt.entity) else {
        return;
    };

    bevy::log::info!(
        "round {:>2} | {:<4} | price {:.2} quality {:.2} | profit {:>7.2} equity {:>7.2} share {:.2} | {:?} for {:?}{}",
        round.0,
        firm.name,
        firm.price.get(),
        firm.quality.get(),
        firm.profit.get(),
        firm.equity.get(),
        firm.share.get(),
        evt.action_name.as_ref().map(ActionName::as_str),
        evt.prioritized_goal,
        if evt.used_fallback { " (fallback)" } else { "" },
    );
}


fn main() {
    App::new()
    .add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_millis(50))),
        bevy::log::LogPlugin::default(),
        AspirationPlugin,
    ))
    .init_resource::<Round>()
    .add_systems(Startup, setup_market)
    .add_systems(Update, (clear_market, request_decisions).chain())
    .add_observer(report_pick)
    .run();
}
