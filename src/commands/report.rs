use ricefield::{DayReport, Engine, Event, Side};

pub(super) fn describe_event(engine: &Engine, event: &Event) -> String {
    let name = |side: Side| engine.agent(side).name.clone();
    match event {
        Event::DayStarted { day } => format!("day {} begins", day),
        Event::WaterCollected { side, amount } => {
            format!("{} collected {} water", name(*side), amount)
        }
        Event::RiceWatered { side, water_spent } => {
            format!("{} watered the rice ({} water)", name(*side), water_spent)
        }
        Event::TileCaptured { side, coord, cost } => {
            format!("{} captured tile {} for {} peasants", name(*side), coord, cost)
        }
        Event::BuildingBuilt {
            side,
            kind,
            building_id,
        } => format!("{} built a {} (#{})", name(*side), kind, building_id),
        Event::ResourceProduced {
            side,
            kind,
            amount,
            building_id,
        } => format!(
            "building #{} gave {} +{} {}",
            building_id,
            name(*side),
            amount,
            kind
        ),
        Event::RiceGrown { side, amount } => {
            format!("{}'s rice grew by {}", name(*side), amount)
        }
        Event::OpponentActed { action } => {
            format!("{} chose {}", name(Side::Opponent), action)
        }
        Event::OpponentRejected { action, error } => {
            format!("{} tried {} but failed: {}", name(Side::Opponent), action, error)
        }
        Event::GameWon {
            winner,
            tiles,
            total_tiles,
        } => format!(
            "{} controls {}/{} tiles and wins",
            name(*winner),
            tiles,
            total_tiles
        ),
        Event::DayCompleted { day } => format!("day {} is over", day),
    }
}

pub(super) fn print_report(engine: &Engine, report: &DayReport) {
    println!("== Day {}: {} ==", report.day, report.player_action);
    for event in &report.events {
        println!("  - {}", describe_event(engine, event));
    }
}

pub(super) fn print_status(engine: &Engine) {
    let state = engine.state();
    println!("Day {}", state.day());
    for side in Side::BOTH {
        println!(
            "  {} ({:.0}% of the map)",
            engine.agent(side),
            state.control_ratio(side) * 100.0
        );
    }
    let houses = |side: Side| engine.buildings().iter().filter(|b| b.owner == side).count();
    println!(
        "  houses: {} {}, {} {}",
        engine.agent(Side::Player).name,
        houses(Side::Player),
        engine.agent(Side::Opponent).name,
        houses(Side::Opponent)
    );
    match engine.winner() {
        Some(side) => println!("Winner: {}", engine.agent(side).name),
        None => println!("Opponent policy: {}", engine.policy_name()),
    }
}

pub(super) fn print_statistics(engine: &Engine) {
    let stats = engine.statistics();
    for side in Side::BOTH {
        let actions = stats.actions(side);
        println!(
            "{}: {} actions (collect {}, water {}, explore {}, build {})",
            engine.agent(side).name,
            actions.total(),
            actions.collect_count,
            actions.water_count,
            actions.explore_count,
            actions.build_count
        );
        println!("  {:>4} {:>6} {:>6} {:>9} {:>6}", "#", "rice", "water", "peasants", "tiles");
        for (idx, sample) in stats.history(side).iter().enumerate() {
            println!(
                "  {:>4} {:>6} {:>6} {:>9} {:>6}",
                idx, sample.rice, sample.water, sample.peasants, sample.tiles
            );
        }
    }
}
