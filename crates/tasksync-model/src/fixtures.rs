//! Deterministic seed data
//!
//! Used to populate an empty store. Output depends only on the seed, the
//! size knobs and the base timestamp, ids included.

use crate::ids::{ProjectId, TaskId};
use crate::project::Project;
use crate::state::StoreState;
use crate::task::Task;
use crate::timestamp::Timestamp;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ulid::Ulid;

const VERBS: &[&str] = &[
    "back up", "bypass", "hack", "override", "compress", "copy", "navigate", "index", "connect",
    "generate", "quantify", "calculate", "synthesize", "input", "transmit", "program", "reboot",
    "parse",
];

const ING_VERBS: &[&str] = &[
    "backing up", "bypassing", "hacking", "overriding", "compressing", "copying", "navigating",
    "indexing", "connecting", "generating", "quantifying", "calculating", "synthesizing",
    "transmitting", "programming", "parsing",
];

const NOUNS: &[&str] = &[
    "driver", "protocol", "bandwidth", "panel", "microchip", "program", "port", "card", "array",
    "interface", "system", "sensor", "firewall", "hard drive", "pixel", "alarm", "feed",
    "monitor", "application", "transmitter", "bus", "circuit", "capacitor", "matrix",
];

const ADJECTIVES: &[&str] = &[
    "auxiliary", "primary", "back-end", "digital", "open-source", "virtual", "cross-platform",
    "redundant", "online", "haptic", "multi-byte", "bluetooth", "wireless", "neural", "optical",
    "solid state", "mobile",
];

/// Seeded generator of projects and tasks
#[derive(Debug, Clone, Copy)]
pub struct FixtureGenerator {
    seed: u64,
    projects: usize,
    tasks_per_project: usize,
    unassigned: usize,
}

impl FixtureGenerator {
    /// Generator with the default sizes: 5 projects, 4 tasks each, 2 unassigned
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            projects: 5,
            tasks_per_project: 4,
            unassigned: 2,
        }
    }

    /// Number of projects
    #[must_use]
    pub fn projects(mut self, count: usize) -> Self {
        self.projects = count;
        self
    }

    /// Number of tasks in each project
    #[must_use]
    pub fn tasks_per_project(mut self, count: usize) -> Self {
        self.tasks_per_project = count;
        self
    }

    /// Number of tasks with an empty `projectId`
    #[must_use]
    pub fn unassigned(mut self, count: usize) -> Self {
        self.unassigned = count;
        self
    }

    /// Produce the seed state, every entity stamped with `base`
    #[must_use]
    pub fn generate(&self, base: Timestamp) -> StoreState {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let ulid_ms = u64::try_from(base.as_millis()).unwrap_or(0);

        let mut project_list = Vec::with_capacity(self.projects);
        let mut todo_list =
            Vec::with_capacity(self.projects * self.tasks_per_project + self.unassigned);

        for i in 0..self.projects {
            let project = Project {
                id: ProjectId::from_ulid(Ulid::from_parts(ulid_ms, rng.random())),
                title: hacker_phrase(&mut rng),
                sort_idx: to_sort_idx(i),
                created_at: base,
                modified_at: base,
            };

            for j in 0..self.tasks_per_project {
                todo_list.push(fake_task(&mut rng, ulid_ms, project.id.clone(), j, base));
            }
            project_list.push(project);
        }

        for j in 0..self.unassigned {
            todo_list.push(fake_task(&mut rng, ulid_ms, ProjectId::from(""), j, base));
        }

        StoreState::new(project_list, todo_list)
    }
}

fn fake_task(
    rng: &mut StdRng,
    ulid_ms: u64,
    project_id: ProjectId,
    index: usize,
    base: Timestamp,
) -> Task {
    Task {
        id: TaskId::from_ulid(Ulid::from_parts(ulid_ms, rng.random())),
        title: task_phrase(rng),
        project_id,
        sort_idx: to_sort_idx(index),
        is_done: rng.random_bool(0.25),
        created_at: base,
        modified_at: base,
    }
}

fn pick<'a>(rng: &mut StdRng, words: &[&'a str]) -> &'a str {
    words[rng.random_range(0..words.len())]
}

fn hacker_phrase(rng: &mut StdRng) -> String {
    format!(
        "{} {} {}",
        pick(rng, VERBS),
        pick(rng, ING_VERBS),
        pick(rng, NOUNS)
    )
}

fn task_phrase(rng: &mut StdRng) -> String {
    format!("{} the {} {}", pick(rng, VERBS), pick(rng, ADJECTIVES), pick(rng, NOUNS))
}

fn to_sort_idx(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}
