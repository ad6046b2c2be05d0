//! Crit roll simulation

use damsim_core::DamageResult;
use rand::Rng;

/// Outcome of rolling a number of hits against one result
pub struct CritSimulation {
    pub hit_count: u32,
    pub crit_count: u32,
    pub total_damage: u64,
    pub min_hit: u64,
    pub max_hit: u64,
    /// The formula's expected figure, for comparison
    pub expected: u64,
}

impl CritSimulation {
    /// Roll `hits` hits; each crits with the result's effective crit rate
    pub fn run(result: &DamageResult, hits: u32, rng: &mut impl Rng) -> Self {
        let mut sim = CritSimulation {
            hit_count: 0,
            crit_count: 0,
            total_damage: 0,
            min_hit: u64::MAX,
            max_hit: 0,
            expected: result.expected,
        };

        for _ in 0..hits {
            let is_crit = rng.gen_range(0.0..100.0) < result.crit_rate;
            let damage = if is_crit {
                sim.crit_count += 1;
                result.on_crit
            } else {
                result.no_crit
            };
            sim.hit_count += 1;
            sim.total_damage = sim.total_damage.saturating_add(damage);
            sim.min_hit = sim.min_hit.min(damage);
            sim.max_hit = sim.max_hit.max(damage);
        }

        if sim.hit_count == 0 {
            sim.min_hit = 0;
        }
        sim
    }

    /// Observed crit rate in percent
    pub fn crit_rate(&self) -> f64 {
        if self.hit_count > 0 {
            self.crit_count as f64 / self.hit_count as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Average damage per hit
    pub fn avg_damage(&self) -> f64 {
        if self.hit_count > 0 {
            self.total_damage as f64 / self.hit_count as f64
        } else {
            0.0
        }
    }

    /// Observed average relative to the expected figure, in percent
    pub fn deviation_pct(&self) -> f64 {
        if self.expected > 0 {
            (self.avg_damage() / self.expected as f64 - 1.0) * 100.0
        } else {
            0.0
        }
    }
}
