//! The episodic memory store: an append-only lesson log with durable snapshots.
//!
//! The store is an explicitly constructed object handed to each run by the host
//! process — there is no module-level singleton. Handles are cheap to clone and
//! share one underlying lesson log; `add_lesson` performs its read-modify-persist
//! cycle under a single write lock so concurrent runs cannot lose appends.
//!
//! Persistence is a whole-store JSON snapshot (`{"memories": [...]}`) written to
//! a temp file and renamed into place, so a crash mid-write leaves the previous
//! snapshot intact.

use crate::error::Result;
use crate::lesson::{Lesson, MemoryStats};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

/// Default durable file, relative to the working directory.
pub const DEFAULT_MEMORY_FILE: &str = "reflexion_memory.json";

/// Durable file layout.
#[derive(Debug, Serialize, Deserialize)]
struct MemoryFile {
    memories: Vec<Lesson>,
}

/// Shared handle to the episodic memory store.
///
/// Cloning the handle shares the same in-memory log and durable file.
#[derive(Clone)]
pub struct EpisodicMemory {
    memories: Arc<RwLock<Vec<Lesson>>>,
    path: Arc<PathBuf>,
}

impl EpisodicMemory {
    /// Open the store at `path`, reading the durable snapshot if one exists.
    ///
    /// Any read or parse failure degrades to an empty store with a warning;
    /// this never fails the caller.
    pub fn load_or_default(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let memories = match Self::read_snapshot(&path) {
            Ok(Some(memories)) => {
                info!(count = memories.len(), file = %path.display(), "loaded episodic memory");
                memories
            }
            Ok(None) => {
                info!(file = %path.display(), "no memory file found, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "could not load memory, starting empty");
                Vec::new()
            }
        };

        Self {
            memories: Arc::new(RwLock::new(memories)),
            path: Arc::new(path),
        }
    }

    fn read_snapshot(path: &Path) -> Result<Option<Vec<Lesson>>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path)?;
        let file: MemoryFile = serde_json::from_str(&raw)?;
        Ok(Some(file.memories))
    }

    /// Append a lesson and persist the whole store.
    ///
    /// A persistence failure is warned and otherwise ignored: the in-memory
    /// append stands and the store remains usable.
    pub fn add_lesson(
        &self,
        task: impl Into<String>,
        solution: impl Into<String>,
        error: impl Into<String>,
        lesson: impl Into<String>,
        success: bool,
    ) {
        let entry = Lesson::new(task, solution, error, lesson, success);

        // Append and persist under one write lock so interleaved runs cannot
        // snapshot a log missing each other's lessons.
        let mut memories = self.memories.write().unwrap();
        memories.push(entry);
        if let Err(e) = self.persist(&memories) {
            warn!(file = %self.path.display(), error = %e, "could not save memory");
        }
    }

    /// All lesson texts, insertion ordered.
    pub fn get_all_lessons(&self) -> Vec<String> {
        let memories = self.memories.read().unwrap();
        memories.iter().map(|m| m.lesson.clone()).collect()
    }

    /// The most recently appended `limit` lesson texts.
    ///
    /// Recency-based, not relevance-based: `task` is accepted for interface
    /// compatibility but does not filter the result. Returns fewer than
    /// `limit` entries when the store holds fewer.
    pub fn get_relevant_lessons(&self, _task: &str, limit: usize) -> Vec<String> {
        let memories = self.memories.read().unwrap();
        let start = memories.len().saturating_sub(limit);
        memories[start..].iter().map(|m| m.lesson.clone()).collect()
    }

    /// Lessons from successful attempts, insertion ordered.
    pub fn get_success_patterns(&self) -> Vec<Lesson> {
        let memories = self.memories.read().unwrap();
        memories.iter().filter(|m| m.success).cloned().collect()
    }

    /// Lessons from failed attempts, insertion ordered.
    pub fn get_failure_patterns(&self) -> Vec<Lesson> {
        let memories = self.memories.read().unwrap();
        memories.iter().filter(|m| !m.success).cloned().collect()
    }

    /// Aggregate statistics over the store.
    pub fn get_stats(&self) -> MemoryStats {
        let memories = self.memories.read().unwrap();
        let total = memories.len();
        let successes = memories.iter().filter(|m| m.success).count();
        let failures = total - successes;

        MemoryStats {
            total_memories: total,
            successes,
            failures,
            success_rate: if total > 0 {
                successes as f64 / total as f64
            } else {
                0.0
            },
        }
    }

    /// Empty the store and persist the empty state immediately.
    pub fn clear(&self) {
        let mut memories = self.memories.write().unwrap();
        memories.clear();
        if let Err(e) = self.persist(&memories) {
            warn!(file = %self.path.display(), error = %e, "could not save cleared memory");
        }
    }

    /// Number of stored lessons.
    pub fn len(&self) -> usize {
        self.memories.read().unwrap().len()
    }

    /// Whether the store holds no lessons.
    pub fn is_empty(&self) -> bool {
        self.memories.read().unwrap().is_empty()
    }

    /// Path of the durable file backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the whole store as a snapshot: temp file, then rename into place.
    fn persist(&self, memories: &[Lesson]) -> Result<()> {
        let file = MemoryFile {
            memories: memories.to_vec(),
        };
        let raw = serde_json::to_string_pretty(&file)?;

        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, raw)?;
        std::fs::rename(&tmp, self.path.as_ref())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> EpisodicMemory {
        EpisodicMemory::load_or_default(dir.path().join("memory.json"))
    }

    #[test]
    fn test_starts_empty_without_file() {
        let dir = tempdir().unwrap();
        let memory = store_in(&dir);

        assert!(memory.is_empty());
        assert!(memory.get_all_lessons().is_empty());
    }

    #[test]
    fn test_add_lesson_appends_and_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.json");
        let memory = EpisodicMemory::load_or_default(&path);

        memory.add_lesson("t1", "s1", "e1", "lesson one", false);
        memory.add_lesson("t2", "s2", "", "lesson two", true);

        assert_eq!(memory.len(), 2);
        assert_eq!(memory.get_all_lessons(), vec!["lesson one", "lesson two"]);
        assert!(path.exists());
    }

    #[test]
    fn test_roundtrip_through_fresh_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.json");

        {
            let memory = EpisodicMemory::load_or_default(&path);
            memory.add_lesson("t1", "s1", "e1", "first", false);
            memory.add_lesson("t2", "s2", "", "second", true);
        }

        let reloaded = EpisodicMemory::load_or_default(&path);
        assert_eq!(reloaded.get_all_lessons(), vec!["first", "second"]);

        let patterns = reloaded.get_success_patterns();
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].task, "t2");
    }

    #[test]
    fn test_corrupt_file_degrades_to_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(&path, "{ not json").unwrap();

        let memory = EpisodicMemory::load_or_default(&path);
        assert!(memory.is_empty());

        // The store stays usable after the bad load.
        memory.add_lesson("t", "s", "", "works", true);
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_relevant_lessons_are_most_recent() {
        let dir = tempdir().unwrap();
        let memory = store_in(&dir);

        for i in 0..7 {
            memory.add_lesson("t", "s", "e", format!("lesson {}", i), false);
        }

        let relevant = memory.get_relevant_lessons("anything", 3);
        assert_eq!(relevant, vec!["lesson 4", "lesson 5", "lesson 6"]);

        // Asking for more than the store holds returns everything.
        let all = memory.get_relevant_lessons("anything", 100);
        assert_eq!(all.len(), 7);
    }

    #[test]
    fn test_relevant_lessons_ignore_task_content() {
        let dir = tempdir().unwrap();
        let memory = store_in(&dir);
        memory.add_lesson("reverse a string", "s", "e", "string lesson", false);

        let relevant = memory.get_relevant_lessons("sort numbers", 5);
        assert_eq!(relevant, vec!["string lesson"]);
    }

    #[test]
    fn test_success_failure_partition() {
        let dir = tempdir().unwrap();
        let memory = store_in(&dir);

        memory.add_lesson("a", "s", "e", "f1", false);
        memory.add_lesson("b", "s", "", "s1", true);
        memory.add_lesson("c", "s", "e", "f2", false);

        let failures = memory.get_failure_patterns();
        let successes = memory.get_success_patterns();
        assert_eq!(failures.len(), 2);
        assert_eq!(successes.len(), 1);
        assert_eq!(failures[0].lesson, "f1");
        assert_eq!(failures[1].lesson, "f2");
    }

    #[test]
    fn test_stats() {
        let dir = tempdir().unwrap();
        let memory = store_in(&dir);

        assert_eq!(memory.get_stats().success_rate, 0.0);

        memory.add_lesson("a", "s", "e", "f", false);
        memory.add_lesson("b", "s", "", "s", true);
        memory.add_lesson("c", "s", "", "s", true);
        memory.add_lesson("d", "s", "e", "f", false);

        let stats = memory.get_stats();
        assert_eq!(stats.total_memories, 4);
        assert_eq!(stats.successes, 2);
        assert_eq!(stats.failures, 2);
        assert_eq!(stats.success_rate, 0.5);
    }

    #[test]
    fn test_clear_is_idempotent_and_persisted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.json");
        let memory = EpisodicMemory::load_or_default(&path);

        memory.add_lesson("a", "s", "e", "f", false);
        memory.clear();
        assert!(memory.is_empty());
        memory.clear();
        assert!(memory.is_empty());

        let reloaded = EpisodicMemory::load_or_default(&path);
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_persist_failure_keeps_in_memory_append() {
        let dir = tempdir().unwrap();
        // A directory path that cannot be written as a file.
        let path = dir.path().join("missing").join("memory.json");
        let memory = EpisodicMemory::load_or_default(&path);

        memory.add_lesson("a", "s", "e", "survives", false);
        assert_eq!(memory.get_all_lessons(), vec!["survives"]);
    }

    #[test]
    fn test_clone_shares_log() {
        let dir = tempdir().unwrap();
        let memory = store_in(&dir);
        let handle = memory.clone();

        memory.add_lesson("a", "s", "e", "via original", false);
        assert_eq!(handle.get_all_lessons(), vec!["via original"]);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn relevant_lessons_length_is_min_of_limit_and_total(
                flags in proptest::collection::vec(any::<bool>(), 0..20),
                limit in 0usize..25,
            ) {
                let dir = tempdir().unwrap();
                let memory = EpisodicMemory::load_or_default(dir.path().join("m.json"));
                for (i, success) in flags.iter().enumerate() {
                    memory.add_lesson("t", "s", "e", format!("l{}", i), *success);
                }

                let relevant = memory.get_relevant_lessons("t", limit);
                prop_assert_eq!(relevant.len(), limit.min(flags.len()));

                // Equals the tail of get_all_lessons, same order.
                let all = memory.get_all_lessons();
                let tail = &all[all.len().saturating_sub(limit)..];
                prop_assert_eq!(relevant.as_slice(), tail);
            }

            #[test]
            fn stats_are_consistent(flags in proptest::collection::vec(any::<bool>(), 0..20)) {
                let dir = tempdir().unwrap();
                let memory = EpisodicMemory::load_or_default(dir.path().join("m.json"));
                for success in &flags {
                    memory.add_lesson("t", "s", "e", "l", *success);
                }

                let stats = memory.get_stats();
                prop_assert_eq!(stats.total_memories, flags.len());
                prop_assert_eq!(stats.successes + stats.failures, stats.total_memories);
                if flags.is_empty() {
                    prop_assert_eq!(stats.success_rate, 0.0);
                } else {
                    let expected = stats.successes as f64 / stats.total_memories as f64;
                    prop_assert_eq!(stats.success_rate, expected);
                }
            }
        }
    }
}
