use dashmap::DashMap;
use std::sync::Arc;

/// Remembers the cleavage sites chosen for each distinct sequence.
///
/// Shared by all workers of an indexing run. The first worker to reach a
/// sequence decides its sites; every later lookup, from any thread, sees the
/// same choice.
#[derive(Debug, Default)]
pub struct SiteMemo {
    sites: DashMap<String, Arc<[usize]>>,
}

impl SiteMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the remembered sites for `sequence`, calling `choose` only if
    /// none have been recorded yet.
    pub fn get_or_choose<F>(&self, sequence: &str, choose: F) -> Arc<[usize]>
    where
        F: FnOnce() -> Vec<usize>,
    {
        if let Some(sites) = self.sites.get(sequence) {
            return Arc::clone(sites.value());
        }
        let entry = self
            .sites
            .entry(sequence.to_string())
            .or_insert_with(|| choose().into());
        Arc::clone(entry.value())
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn first_choice_wins() {
        let memo = SiteMemo::new();
        let first = memo.get_or_choose("PEPCTIDE", || vec![3]);
        let second = memo.get_or_choose("PEPCTIDE", || vec![5]);
        assert_eq!(&*first, &[3]);
        assert_eq!(&*second, &[3]);
        assert_eq!(memo.len(), 1);
    }

    #[test]
    fn concurrent_lookups_agree() {
        let memo = SiteMemo::new();
        let choices: Vec<Arc<[usize]>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..16usize)
                .map(|i| {
                    let memo = &memo;
                    scope.spawn(move || memo.get_or_choose("ACCCK", || vec![i % 3 + 1]))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect()
        });
        assert!(choices.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(memo.len(), 1);
    }
}
