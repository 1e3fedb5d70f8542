use slotmap::{Key, SecondaryMap};

/// Union-find over slotmap keys, with path compression and union by rank.
#[derive(Debug)]
pub struct DisjointSet<K: Key> {
    parent: SecondaryMap<K, K>,
    rank: SecondaryMap<K, u32>,
}

impl<K: Key> Default for DisjointSet<K> {
    fn default() -> Self {
        Self {
            parent: SecondaryMap::new(),
            rank: SecondaryMap::new(),
        }
    }
}

impl<K: Key> DisjointSet<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the representative of `k`, registering it as a singleton on
    /// first sight.
    pub fn find(&mut self, k: K) -> K {
        let mut root = k;
        loop {
            match self.parent.get(root) {
                Some(&p) if p != root => root = p,
                Some(_) => break,
                None => {
                    self.parent.insert(root, root);
                    self.rank.insert(root, 0);
                    break;
                }
            }
        }
        let mut cur = k;
        while cur != root {
            let next = self.parent.get(cur).copied().unwrap_or(root);
            self.parent.insert(cur, root);
            cur = next;
        }
        root
    }

    pub fn union(&mut self, a: K, b: K) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        let rank_a = self.rank.get(ra).copied().unwrap_or(0);
        let rank_b = self.rank.get(rb).copied().unwrap_or(0);
        if rank_a < rank_b {
            self.parent.insert(ra, rb);
        } else if rank_a > rank_b {
            self.parent.insert(rb, ra);
        } else {
            self.parent.insert(rb, ra);
            self.rank.insert(ra, rank_a + 1);
        }
    }
}
