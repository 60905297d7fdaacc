use std::collections::BTreeSet;
use std::sync::{LazyLock, Mutex};

use flexi_logger::{Logger, LoggerHandle};

#[allow(dead_code)]
pub static LOGGER: LazyLock<Mutex<LoggerHandle>> = LazyLock::new(|| {
    Mutex::new(
        Logger::try_with_env_or_str("info")
            .unwrap()
            .write_mode(flexi_logger::WriteMode::SupportCapture)
            .log_to_stdout()
            .set_palette("196;208;3;7;8".to_owned())
            .format(|w, now, record| {
                let style = flexi_logger::style(record.level());
                write!(
                    w,
                    "{} {pref}[{}] {}{suf}",
                    now.format("%H:%M:%S"),
                    &record.level().as_str()[0..1],
                    record.args(),
                    pref = style.prefix(),
                    suf = style.suffix(),
                )
            })
            .start()
            .unwrap(),
    )
});

#[allow(dead_code)]
pub fn init_logger() {
    let _ = &*LOGGER;
}

/// Naive reference model: adjacency-list forest, connectivity via BFS,
/// components via flood fill. Used to cross-check `Tour`'s connectivity and
/// component-membership answers in the stress test without trusting the
/// treap at all.
#[derive(Debug, Default)]
pub struct SlowForest {
    adj: std::collections::BTreeMap<u32, BTreeSet<u32>>,
}

#[allow(dead_code)]
impl SlowForest {
    pub fn create_vertex(&mut self, v: u32) {
        self.adj.entry(v).or_default();
    }

    pub fn remove_vertex(&mut self, v: u32) {
        self.adj.remove(&v);
    }

    pub fn link(&mut self, u: u32, v: u32) {
        self.adj.entry(u).or_default().insert(v);
        self.adj.entry(v).or_default().insert(u);
    }

    pub fn cut(&mut self, u: u32, v: u32) {
        self.adj.get_mut(&u).unwrap().remove(&v);
        self.adj.get_mut(&v).unwrap().remove(&u);
    }

    pub fn connected(&self, u: u32, v: u32) -> bool {
        if u == v {
            return self.adj.contains_key(&u);
        }
        if !self.adj.contains_key(&u) || !self.adj.contains_key(&v) {
            return false;
        }
        let mut seen = BTreeSet::new();
        let mut stack = vec![u];
        while let Some(x) = stack.pop() {
            if x == v {
                return true;
            }
            if seen.insert(x) {
                stack.extend(self.adj[&x].iter().copied());
            }
        }
        false
    }

    pub fn component(&self, v: u32) -> BTreeSet<u32> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![v];
        while let Some(x) = stack.pop() {
            if seen.insert(x) {
                if let Some(neighbors) = self.adj.get(&x) {
                    stack.extend(neighbors.iter().copied());
                }
            }
        }
        seen
    }

    pub fn n_components(&self) -> usize {
        let mut seen = BTreeSet::new();
        let mut count = 0;
        for &v in self.adj.keys() {
            if !seen.contains(&v) {
                seen.extend(self.component(v));
                count += 1;
            }
        }
        count
    }

    pub fn is_edge(&self, u: u32, v: u32) -> bool {
        self.adj.get(&u).map_or(false, |s| s.contains(&v))
    }
}
