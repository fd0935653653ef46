//! Coffeebreak - Command Line Interface
//!
//! This is the main entry point for the rest calculator.
//! Run with `--help` to see all available options.

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use tracing_subscriber::EnvFilter;

use coffeebreak::{
    data::LevelTables,
    display::{display_results, format_duration},
    models::{Character, CharacterStats, RestParams, SortKey},
    profile::{CharacterProfile, ProfileStore},
    reducer::reduce,
    search::run_search,
    CoffeeError,
};

/// Command-line arguments for Coffeebreak.
#[derive(Parser, Debug)]
#[command(name = "coffeebreak")]
#[command(author, version, long_about = None)]
#[command(about = "Find every spell slot combination a warlock/sorcerer can build during a rest")]
struct Args {
    // ========== Character ==========
    /// Warlock class level
    #[arg(short, long)]
    warlock_level: Option<u32>,

    /// Sorcerer class level
    #[arg(short, long)]
    sorcerer_level: Option<u32>,

    /// Override the number of pact slots from the level table
    #[arg(long)]
    slots_total: Option<u32>,

    /// Override the pact slot level from the level table
    #[arg(long)]
    slot_tier: Option<u32>,

    /// Override the sorcery point maximum from the level table
    #[arg(long)]
    points_total: Option<u32>,

    /// Directory holding warlock.csv and sorcerer.csv (embedded tables otherwise)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    // ========== Rest ==========
    /// Pact slots available when the rest starts (defaults to all)
    #[arg(long)]
    slots: Option<u32>,

    /// Sorcery points available when the rest starts (defaults to all)
    #[arg(long)]
    points: Option<u32>,

    /// The rod can be used during this rest
    #[arg(long, default_value = "false")]
    rod: bool,

    /// The vial can be used during this rest
    #[arg(long, default_value = "false")]
    vial: bool,

    /// Length of the rest in hours
    #[arg(short = 'H', long, default_value = "8")]
    hours: u32,

    /// Sorcery points that must remain at the end of the rest
    #[arg(long, default_value = "0")]
    min_points: u32,

    /// Pact slots that must remain at the end of the rest
    #[arg(long, default_value = "0")]
    min_slots: u32,

    // ========== Output ==========
    /// Keep dominated combinations instead of only the optimal ones
    #[arg(long, default_value = "false")]
    all: bool,

    /// Sort order, comma separated (tier5,tier4,tier3,tier2,tier1,total)
    #[arg(long, value_delimiter = ',')]
    sort: Vec<SortKey>,

    /// Number of combinations to print
    #[arg(long, default_value = "10")]
    show: usize,

    /// Print how each combination is reached
    #[arg(long, default_value = "false")]
    actions: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    // ========== Profiles ==========
    /// Profile store file
    #[arg(long, default_value = "profiles.json")]
    profiles: PathBuf,

    /// Load a saved character (the active one when no level is given)
    #[arg(short, long)]
    profile: Option<String>,

    /// Save the character under this name and make it active
    #[arg(long)]
    save_profile: Option<String>,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut store = ProfileStore::load(&args.profiles)?;

    // Profile named on the command line, else the active one when no levels were given
    let profile = match &args.profile {
        Some(name) => Some(
            store
                .get(name)
                .cloned()
                .ok_or_else(|| CoffeeError::ProfileNotFound(name.clone()))?,
        ),
        None if args.warlock_level.is_none() && args.sorcerer_level.is_none() => {
            store.active_profile().cloned()
        }
        None => None,
    };

    let saved = profile.as_ref().map(CharacterProfile::character);
    let warlock_level = args.warlock_level.or(saved.map(|c| c.warlock_level));
    let sorcerer_level = args.sorcerer_level.or(saved.map(|c| c.sorcerer_level));
    let rod = args.rod || profile.as_ref().is_some_and(|p| p.has_rod);
    let vial = args.vial || profile.as_ref().is_some_and(|p| p.has_vial);

    let tables = match &args.data_dir {
        Some(dir) => LevelTables::load(dir)?,
        None => LevelTables::embedded()?,
    };

    let table_stats = match (warlock_level, sorcerer_level) {
        (Some(warlock_level), Some(sorcerer_level)) => Some(
            Character {
                warlock_level,
                sorcerer_level,
            }
            .stats(&tables)?,
        ),
        _ => None,
    };

    let stats = match (
        args.slots_total.or(table_stats.map(|s| s.slots_total)),
        args.slot_tier.or(table_stats.map(|s| s.slot_tier)),
        args.points_total.or(table_stats.map(|s| s.points_total)),
    ) {
        (Some(slots_total), Some(slot_tier), Some(points_total)) => CharacterStats {
            slots_total,
            slot_tier,
            points_total,
        },
        _ => {
            eprintln!(
                "Error: give --warlock-level and --sorcerer-level, a --profile, \
                 or all of --slots-total, --slot-tier and --points-total."
            );
            std::process::exit(1);
        }
    };

    if let Some(name) = &args.save_profile {
        match (warlock_level, sorcerer_level) {
            (Some(warlock_level), Some(sorcerer_level)) => {
                store.upsert(CharacterProfile {
                    name: name.clone(),
                    warlock_level,
                    sorcerer_level,
                    has_rod: rod,
                    has_vial: vial,
                    sort_order: (!args.sort.is_empty()).then(|| args.sort.clone()),
                });
                store.set_active(name)?;
                store.save(&args.profiles)?;
                println!("Saved profile '{}' to {}", name, args.profiles.display());
            }
            _ => eprintln!("[WARNING] Profiles store class levels; not saving '{}'.", name),
        }
    }

    let params = RestParams::for_character(
        &stats,
        args.slots.unwrap_or(stats.slots_total),
        args.points.unwrap_or(stats.points_total),
        rod,
        vial,
        args.hours,
        args.min_points,
        args.min_slots,
    );
    params.validate()?;

    let sort_keys = if !args.sort.is_empty() {
        args.sort.clone()
    } else {
        profile
            .as_ref()
            .map(CharacterProfile::sort_keys)
            .unwrap_or_else(|| SortKey::DEFAULT_ORDER.to_vec())
    };

    println!("Coffeebreak - Rest Spell Slot Calculator");
    println!("================================================================");
    println!();
    println!("Configuration:");
    if let Some(p) = &profile {
        println!("  Profile:         {}", p.name);
    }
    println!(
        "  Pact Slots:      {}/{} (level {})",
        params.slots_current, params.slots_total, params.slot_tier
    );
    println!("  Sorcery Points:  {}/{}", params.points_current, params.points_total);
    println!(
        "  Rod / Vial:      {} / {}",
        yes_no(params.rod_available),
        yes_no(params.vial_available)
    );
    println!("  Rest:            {} hour(s)", params.sleep_hours);
    println!(
        "  Keep at least:   {} point(s), {} slot(s)",
        params.minimum_points, params.minimum_slots
    );
    println!(
        "  Sort:            {}",
        sort_keys.iter().map(SortKey::to_string).collect::<Vec<_>>().join(", ")
    );

    let started = Instant::now();
    let report = run_search(&params);
    let search_time = started.elapsed();
    let found = report.results.len();

    if found == 0 {
        println!();
        if report.stats.short_circuited {
            println!("[WARNING] Not enough resources to create a single spell slot.");
        } else {
            println!("[WARNING] No possible combinations were found.");
        }
        return Ok(());
    }

    let reduced = reduce(report.results, !args.all, &sort_keys);
    tracing::info!(
        states = report.stats.states_explored,
        reduced = reduced.len(),
        total = %format_duration(started.elapsed()),
        "results reduced"
    );

    display_results(&reduced, found, search_time, args.show, args.actions);

    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
