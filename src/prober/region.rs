use rand::Rng;

/// Baseline metrics for a simulated test origin. All timings in milliseconds,
/// resource size in bytes.
#[derive(Debug, Clone, Copy)]
pub struct RegionProfile {
    pub fcp: u64,
    pub resource: u64,
    pub tti: u64,
    pub dns: u64,
    pub tcp: u64,
}

/// Read-only table of region baselines, built once at startup. Lookups for
/// unknown keys fall back to the default entry instead of failing.
const PROFILES: &[(&str, RegionProfile)] = &[
    ("beijing", RegionProfile { fcp: 800, resource: 350_000, tti: 1_500, dns: 120, tcp: 180 }),
    ("shanghai", RegionProfile { fcp: 900, resource: 360_000, tti: 1_650, dns: 130, tcp: 190 }),
    ("shenzhen", RegionProfile { fcp: 950, resource: 330_000, tti: 1_700, dns: 135, tcp: 200 }),
    ("guangzhou", RegionProfile { fcp: 1_000, resource: 340_000, tti: 1_800, dns: 140, tcp: 210 }),
    ("hangzhou", RegionProfile { fcp: 1_100, resource: 380_000, tti: 1_900, dns: 150, tcp: 220 }),
    ("chengdu", RegionProfile { fcp: 1_200, resource: 370_000, tti: 2_100, dns: 170, tcp: 260 }),
    ("singapore", RegionProfile { fcp: 1_400, resource: 390_000, tti: 2_400, dns: 200, tcp: 300 }),
    ("virginia", RegionProfile { fcp: 1_900, resource: 410_000, tti: 3_000, dns: 280, tcp: 430 }),
    ("frankfurt", RegionProfile { fcp: 2_100, resource: 420_000, tti: 3_300, dns: 320, tcp: 480 }),
];

const DEFAULT_REGION: &str = "beijing";

pub fn profile_for(region: &str) -> RegionProfile {
    lookup(region)
        .or_else(|| lookup(DEFAULT_REGION))
        .expect("default region missing from profile table")
}

fn lookup(region: &str) -> Option<RegionProfile> {
    PROFILES
        .iter()
        .find(|(key, _)| *key == region)
        .map(|(_, profile)| *profile)
}

/// Applies a symmetric ±10% jitter to a baseline value and truncates.
pub fn jitter<R: Rng>(rng: &mut R, baseline: u64) -> u64 {
    let factor = 1.0 + (rng.gen_range(0.0..1.0f64) - 0.5) * 0.2;
    (baseline as f64 * factor) as u64
}
