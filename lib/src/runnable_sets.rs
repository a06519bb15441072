//! Deterministic runnable-set generator: a fixed 20-runnable base shape with
//! randomized dependency wiring, written one JSON file per graph.
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::dag_creator::{
    dump_specs_to_json, json_paths_from_dir, load_specs_from_json, RunnableSpec, RunnableType,
};
use crate::errors::SchedulerError;

pub const DEFAULT_NUM_SETS: usize = 50;
pub const DEFAULT_SEED: u64 = 2025;

const MAX_DEPS: usize = 2;

/// The balanced base set: two periodic sources feeding eighteen event
/// runnables. Dependency wiring is what `generate_dependency_sets` varies;
/// execution times, periods, and priorities stay fixed.
pub fn base_runnable_set() -> BTreeMap<String, RunnableSpec> {
    let entries: [(&str, RunnableSpec); 20] = [
        ("Runnable1", RunnableSpec::periodic(100, 15, 1)),
        ("Runnable2", RunnableSpec::periodic(180, 20, 2)),
        ("Runnable3", RunnableSpec::event(25, 1, &["Runnable1"])),
        ("Runnable4", RunnableSpec::event(30, 4, &["Runnable1"])),
        ("Runnable5", RunnableSpec::event(20, 3, &["Runnable2"])),
        ("Runnable6", RunnableSpec::event(35, 1, &["Runnable2"])),
        ("Runnable7", RunnableSpec::event(40, 2, &["Runnable3", "Runnable4"])),
        ("Runnable8", RunnableSpec::event(25, 1, &["Runnable5", "Runnable6"])),
        ("Runnable9", RunnableSpec::event(30, 0, &["Runnable3"])),
        ("Runnable10", RunnableSpec::event(20, 4, &["Runnable4"])),
        ("Runnable11", RunnableSpec::event(45, 2, &["Runnable7"])),
        ("Runnable12", RunnableSpec::event(30, 0, &["Runnable8"])),
        ("Runnable13", RunnableSpec::event(35, 3, &["Runnable9", "Runnable10"])),
        ("Runnable14", RunnableSpec::event(25, 1, &["Runnable11"])),
        ("Runnable15", RunnableSpec::event(40, 3, &["Runnable12"])),
        ("Runnable16", RunnableSpec::event(20, 3, &["Runnable13"])),
        ("Runnable17", RunnableSpec::event(50, 4, &["Runnable14", "Runnable15"])),
        ("Runnable18", RunnableSpec::event(25, 1, &["Runnable16"])),
        ("Runnable19", RunnableSpec::event(35, 4, &["Runnable17", "Runnable18"])),
        ("Runnable20", RunnableSpec::event(30, 2, &["Runnable19"])),
    ];
    entries
        .into_iter()
        .map(|(name, spec)| (name.to_string(), spec))
        .collect()
}

fn numeric_suffix(name: &str) -> (u64, String) {
    let digits: String = name
        .chars()
        .skip_while(|ch| !ch.is_ascii_digit())
        .collect();
    (digits.parse().unwrap_or(u64::MAX), name.to_string())
}

/// Base names in their natural numeric order; dependency candidates for a
/// runnable are the strictly earlier names, which keeps every set a DAG.
fn ordered_names(base: &BTreeMap<String, RunnableSpec>) -> Vec<String> {
    let mut names: Vec<String> = base.keys().cloned().collect();
    names.sort_by_key(|name| numeric_suffix(name));
    names
}

fn generate_set(
    base: &BTreeMap<String, RunnableSpec>,
    names: &[String],
    rng: &mut StdRng,
) -> BTreeMap<String, RunnableSpec> {
    let mut current = BTreeMap::new();
    let mut earlier: Vec<String> = Vec::new();
    for name in names {
        let mut spec = base[name].clone();
        if spec.runnable_type == RunnableType::Periodic {
            spec.deps = Vec::new();
        } else {
            let dep_count = if earlier.is_empty() {
                0
            } else {
                rng.gen_range(0..=MAX_DEPS).min(earlier.len())
            };
            let mut deps: Vec<String> =
                earlier.choose_multiple(rng, dep_count).cloned().collect();
            deps.sort_by_key(|dep| numeric_suffix(dep));
            spec.deps = deps;
        }
        current.insert(name.clone(), spec);
        earlier.push(name.clone());
    }
    current
}

fn wiring_key(set: &BTreeMap<String, RunnableSpec>) -> Vec<(String, Vec<String>)> {
    set.iter()
        .map(|(name, spec)| (name.clone(), spec.deps.clone()))
        .collect()
}

/// Generates `num_sets` distinct dependency wirings of the base shape.
/// Fully determined by the seed; duplicate wirings are rerolled with a
/// derived seed until distinct.
pub fn generate_dependency_sets(
    base: &BTreeMap<String, RunnableSpec>,
    num_sets: usize,
    seed: u64,
) -> Vec<BTreeMap<String, RunnableSpec>> {
    let names = ordered_names(base);
    let mut sets = Vec::with_capacity(num_sets);
    let mut seen = BTreeSet::new();

    for index in 0..num_sets {
        let mut attempt: u64 = 0;
        loop {
            let set_seed = seed
                .wrapping_add((index as u64) << 8)
                .wrapping_add(attempt.wrapping_mul(0x9e37_79b9));
            let mut rng = StdRng::seed_from_u64(set_seed);
            let candidate = generate_set(base, &names, &mut rng);
            if seen.insert(wiring_key(&candidate)) {
                sets.push(candidate);
                break;
            }
            attempt += 1;
        }
    }
    sets
}

pub fn write_sets_to_dir(
    sets: &[BTreeMap<String, RunnableSpec>],
    dir_path: &str,
) -> Result<(), SchedulerError> {
    for (index, set) in sets.iter().enumerate() {
        let file_path = Path::new(dir_path).join(format!("runnable_set_{:02}.json", index + 1));
        dump_specs_to_json(&file_path.to_string_lossy(), set)?;
    }
    Ok(())
}

pub fn load_sets_from_dir(
    dir_path: &str,
) -> Result<Vec<BTreeMap<String, RunnableSpec>>, SchedulerError> {
    let mut sets = Vec::new();
    for file_path in json_paths_from_dir(dir_path)? {
        sets.push(load_specs_from_json(&file_path)?);
    }
    Ok(sets)
}

/// Returns the sets already present in the directory, generating and writing
/// the default collection when it is empty or missing.
pub fn load_or_generate_sets(
    dir_path: &str,
    num_sets: usize,
    seed: u64,
) -> Result<Vec<BTreeMap<String, RunnableSpec>>, SchedulerError> {
    if let Ok(sets) = load_sets_from_dir(dir_path) {
        if !sets.is_empty() {
            return Ok(sets);
        }
    }
    let sets = generate_dependency_sets(&base_runnable_set(), num_sets, seed);
    write_sets_to_dir(&sets, dir_path)?;
    Ok(sets)
}
