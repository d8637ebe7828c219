use uuid::Uuid;

/// Length of the random seed taken from a v4 uuid
const SEED_LEN: usize = 12;

/// Random per-process seed shared by all ids of one generator
pub fn session_seed() -> String {
    let mut seed = Uuid::new_v4().simple().to_string();
    seed.truncate(SEED_LEN);
    seed
}

/// Sequential ID generator for nodes and blocks created during authoring
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: String,
    seed: String, // Random per generator
    count: u32,   // Sequential counter
}

impl IdGenerator {
    pub fn new(prefix: &str) -> Self {
        Self::from_seed(prefix, session_seed())
    }

    pub fn from_seed(prefix: &str, seed: impl Into<String>) -> Self {
        Self {
            prefix: prefix.to_string(),
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}-{}", self.prefix, self.seed, self.count)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::from_seed("node", "abc");

        assert_eq!(gen.new_id(), "node-abc-1");
        assert_eq!(gen.new_id(), "node-abc-2");
        assert_eq!(gen.new_id(), "node-abc-3");
    }

    #[test]
    fn test_generators_do_not_collide() {
        let mut a = IdGenerator::new("node");
        let mut b = IdGenerator::new("node");
        assert_ne!(a.seed(), b.seed());
        assert_eq!(a.seed().len(), SEED_LEN);

        let ids: HashSet<String> = (0..50).flat_map(|_| [a.new_id(), b.new_id()]).collect();
        assert_eq!(ids.len(), 100);
    }
}
