//! Pixel Legion Headless Simulation Harness
//!
//! Runs engine scenarios in-process - no renderer, no input device.
//!
//! Usage:
//!   cargo run -p legion-simtest
//!   cargo run -p legion-simtest -- --verbose
//!   cargo run -p legion-simtest -- --config tuning.json --seed 7 --ticks 3600

use std::path::PathBuf;

use clap::Parser;
use legion_core::prelude::*;
use legion_logic::config::SimConfig;
use legion_logic::faction::Owner;
use legion_logic::geometry::Vec2;
use legion_logic::hull::{hull_contains, HullGeometry};

// ── Arguments ───────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "legion-simtest", about = "Headless Pixel Legion scenario runner")]
struct Args {
    /// Print every result and debug-level engine logs
    #[arg(long)]
    verbose: bool,
    /// JSON tuning file; missing keys keep their defaults
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for the simulation random source
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Ticks to run the skirmish for, at 60 ticks per second
    #[arg(long, default_value_t = 1800, value_parser = clap::value_parser!(u32).range(1..))]
    ticks: u32,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    // RUST_LOG still overrides the default filter
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .format_timestamp(None)
        .try_init();
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let options = Args::parse();
    init_logging(options.verbose);

    let config = match &options.config {
        Some(path) => match SimConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("failed to load {}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => SimConfig::default(),
    };

    println!("=== Pixel Legion Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Hull engine
    results.extend(validate_hull());

    // 2. Merge protocol
    results.extend(validate_merge(&config, options.seed));

    // 3. Combat attrition
    results.extend(validate_combat(&config, options.seed));

    // 4. Full skirmish run
    results.extend(validate_skirmish(&config, options.seed, options.ticks, options.verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || options.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Hull ─────────────────────────────────────────────────────────────

fn validate_hull() -> Vec<TestResult> {
    println!("--- Hull Engine ---");
    let mut results = Vec::new();

    let square = [
        Vec2::new(0.0, 0.0),
        Vec2::new(10.0, 0.0),
        Vec2::new(10.0, 10.0),
        Vec2::new(0.0, 10.0),
        Vec2::new(5.0, 5.0),
    ];
    let geo = HullGeometry::compute(&square, 20.0, Vec2::ZERO);
    results.push(TestResult {
        name: "hull_square_drops_interior".into(),
        passed: geo.hull.len() == 4 && !geo.hull.contains(&Vec2::new(5.0, 5.0)),
        detail: format!("{} hull vertices", geo.hull.len()),
    });

    let single = HullGeometry::compute(&[Vec2::new(3.0, 4.0)], 20.0, Vec2::ZERO);
    results.push(TestResult {
        name: "hull_single_member_has_area".into(),
        passed: single.bounds.width() > 0.0 && single.bounds.height() > 0.0,
        detail: format!(
            "bounds {:.0}x{:.0}",
            single.bounds.width(),
            single.bounds.height()
        ),
    });

    let empty = HullGeometry::compute(&[], 20.0, Vec2::new(7.0, 9.0));
    results.push(TestResult {
        name: "hull_empty_collapses_to_anchor".into(),
        passed: empty.bounds.min == Vec2::new(7.0, 9.0) && empty.bounds.max == Vec2::new(7.0, 9.0),
        detail: format!("bounds {:?}", empty.bounds),
    });

    results
}

// ── 2. Merge ────────────────────────────────────────────────────────────

fn validate_merge(config: &SimConfig, seed: u64) -> Vec<TestResult> {
    println!("--- Merge Protocol ---");
    let mut results = Vec::new();
    let mut engine = SimulationEngine::with_config(config.clone(), seed);

    let spawn = |engine: &mut SimulationEngine, owner: Owner, kind: GroupKind, x: f32, n: usize| {
        engine.spawn_group(GroupSpawn::new(kind, owner, Vec2::new(x, 0.0)).with_members(n))
    };
    let (Some(a), Some(b), Some(other)) = (
        spawn(&mut engine, Owner::ENEMY, GroupKind::Enemy, 0.0, 5),
        spawn(&mut engine, Owner::ENEMY, GroupKind::Enemy, 10.0, 3),
        spawn(&mut engine, Owner::PLAYER, GroupKind::PlayerControlled, 5.0, 3),
    ) else {
        results.push(TestResult {
            name: "merge_setup".into(),
            passed: false,
            detail: "group spawn refused".into(),
        });
        return results;
    };

    let refused = engine.merge(a, other);
    results.push(TestResult {
        name: "merge_refuses_owner_mismatch".into(),
        passed: matches!(refused, Err(MergeRefusal::OwnerMismatch { .. })) && engine.group_count() == 3,
        detail: match &refused {
            Err(r) => format!("refused: {}", r),
            Ok(e) => format!("unexpectedly merged into {:?}", e),
        },
    });

    let before = engine.members_of(Owner::ENEMY);
    match engine.merge(a, b) {
        Ok(merged) => {
            let count = engine
                .world
                .get::<&Members>(merged)
                .map(|m| m.len())
                .unwrap_or(0);
            results.push(TestResult {
                name: "merge_conserves_members".into(),
                passed: count == before && count == 8,
                detail: format!("{} members after merge ({} before)", count, before),
            });
        }
        Err(e) => results.push(TestResult {
            name: "merge_conserves_members".into(),
            passed: false,
            detail: format!("merge refused: {}", e),
        }),
    }

    results
}

// ── 3. Combat ───────────────────────────────────────────────────────────

fn validate_combat(config: &SimConfig, seed: u64) -> Vec<TestResult> {
    println!("--- Combat ---");
    let mut results = Vec::new();
    let mut engine = SimulationEngine::with_config(config.clone(), seed);

    let range = config.combat.attack_range;
    let attacker = engine.spawn_group(
        GroupSpawn::new(GroupKind::PlayerControlled, Owner::PLAYER, Vec2::ZERO).with_members(50),
    );
    let target = engine.spawn_group(
        GroupSpawn::new(GroupKind::Enemy, Owner::ENEMY, Vec2::new(range * 0.5, 0.0)).with_members(2),
    );
    let (Some(_), Some(target)) = (attacker, target) else {
        results.push(TestResult {
            name: "combat_setup".into(),
            passed: false,
            detail: "group spawn refused".into(),
        });
        return results;
    };

    // Enough ticks for at least two cooldowns
    let dt = 1.0 / 60.0;
    let ticks = ((config.combat.cooldown_secs * 2.5) / f64::from(dt)).ceil() as u32;
    let mut attacks = 0;
    let mut destroyed = 0;
    for _ in 0..ticks {
        let report = engine.update(dt);
        attacks += report.attacks;
        destroyed += report.destroyed;
    }

    results.push(TestResult {
        name: "combat_two_member_target_removed".into(),
        passed: !engine.world.contains(target) && destroyed >= 1,
        detail: format!("{} attacks over {} ticks, {} destroyed", attacks, ticks, destroyed),
    });

    let frame = engine.render_frame();
    results.push(TestResult {
        name: "combat_tracers_fade".into(),
        passed: frame.attacks.iter().all(|a| (0.0..=1.0).contains(&a.alpha)),
        detail: format!("{} tracers in flight", frame.attacks.len()),
    });

    results
}

// ── 4. Skirmish ─────────────────────────────────────────────────────────

fn validate_skirmish(config: &SimConfig, seed: u64, ticks: u32, verbose: bool) -> Vec<TestResult> {
    println!("--- Skirmish ---");
    let mut results = Vec::new();

    let run = |seed: u64| {
        let mut engine = SimulationEngine::with_config(config.clone(), seed);
        engine.spawn_unit(UnitKind::Player, Owner::PLAYER, Vec2::new(0.0, 0.0));
        engine.spawn_unit(UnitKind::Enemy, Owner::ENEMY, Vec2::new(180.0, 40.0));
        let mut totals = TickReport::default();
        for _ in 0..ticks {
            let r = engine.update(1.0 / 60.0);
            totals.spawned += r.spawned;
            totals.merges += r.merges;
            totals.attacks += r.attacks;
            totals.destroyed += r.destroyed;
        }
        (engine, totals)
    };

    let (engine, totals) = run(seed);
    let (replay, replay_totals) = run(seed);

    if verbose {
        println!(
            "  {} ticks: {} spawned, {} merges, {} attacks, {} destroyed",
            ticks, totals.spawned, totals.merges, totals.attacks, totals.destroyed
        );
        if let Ok(json) = serde_json::to_string(&engine.render_frame().units) {
            println!("  units: {}", json);
        }
    }

    results.push(TestResult {
        name: "skirmish_deterministic".into(),
        passed: totals == replay_totals && engine.render_frame() == replay.render_frame(),
        detail: format!("seed {} replayed identically", seed),
    });

    let stats = engine.ctx.pool.stats();
    let live = engine.member_count() as u64;
    results.push(TestResult {
        name: "skirmish_member_accounting".into(),
        passed: stats.acquired == live + stats.released + stats.dropped,
        detail: format!(
            "{} acquired = {} live + {} released + {} dropped",
            stats.acquired, live, stats.released, stats.dropped
        ),
    });

    let empty_groups = engine
        .world
        .query::<&Members>()
        .iter()
        .filter(|(_, m)| m.is_empty())
        .count();
    results.push(TestResult {
        name: "skirmish_no_empty_groups".into(),
        passed: empty_groups == 0,
        detail: format!("{} groups alive", engine.group_count()),
    });

    let bounds_ok = engine.render_frame().groups.iter().all(|g| {
        g.members
            .iter()
            .all(|m| {
                let b = g.bounds;
                m.position.x >= b.min.x - 0.5
                    && m.position.x <= b.max.x + 0.5
                    && m.position.y >= b.min.y - 0.5
                    && m.position.y <= b.max.y + 0.5
            })
    });
    results.push(TestResult {
        name: "skirmish_bounds_cover_members".into(),
        passed: bounds_ok,
        detail: "every member inside its group's padded box".into(),
    });

    let frame = engine.render_frame();
    let outside = frame
        .groups
        .iter()
        .flat_map(|g| g.members.iter().map(move |m| (g, m)))
        .filter(|(g, m)| !hull_contains(&g.hull, m.position, 1.0))
        .count();
    results.push(TestResult {
        name: "skirmish_hulls_contain_members".into(),
        passed: outside == 0,
        detail: format!("{} members outside their expanded hull", outside),
    });

    let auras = engine.groups_of(GroupKind::Aura);
    let followed = auras
        .iter()
        .filter_map(|&aura| engine.world.get::<&Follows>(aura).ok().map(|f| f.0))
        .filter(|&unit| engine.world.contains(unit))
        .count();
    results.push(TestResult {
        name: "skirmish_one_aura_per_unit".into(),
        passed: auras.len() == engine.unit_count() && followed == auras.len(),
        detail: format!("{} auras, {} units", auras.len(), engine.unit_count()),
    });

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["legion-simtest"]).unwrap();
        assert!(!args.verbose);
        assert!(args.config.is_none());
        assert_eq!(args.seed, 42);
        assert_eq!(args.ticks, 1800);
    }

    #[test]
    fn test_args_overrides() {
        let args = Args::try_parse_from([
            "legion-simtest",
            "--verbose",
            "--config",
            "tuning.json",
            "--seed",
            "7",
            "--ticks",
            "3600",
        ])
        .unwrap();
        assert!(args.verbose);
        assert_eq!(args.config, Some(PathBuf::from("tuning.json")));
        assert_eq!(args.seed, 7);
        assert_eq!(args.ticks, 3600);
    }

    #[test]
    fn test_args_rejects_bad_values() {
        assert!(Args::try_parse_from(["legion-simtest", "--ticks", "0"]).is_err());
        assert!(Args::try_parse_from(["legion-simtest", "--seed", "abc"]).is_err());
        assert!(Args::try_parse_from(["legion-simtest", "--frobnicate"]).is_err());
    }

    #[test]
    fn test_logging_installs_once() {
        init_logging(true);
        // A second install is ignored rather than panicking
        init_logging(false);
    }
}
