use std::time::{Duration, Instant};

use anyhow::Context as _;
use clipmask::{ClipMaskApplicator, ScalarApplicator, default_applicator};

#[derive(Clone, Debug)]
struct BenchArgs {
    pixels: usize,
    warmup: u32,
    repeats: u32,
    check: bool,
}

#[derive(Clone, Debug, Default)]
struct RunMetrics {
    scalar: Duration,
    default_backend: Duration,
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let args = parse_args()?;
    if args.pixels == 0 {
        anyhow::bail!("--pixels must be > 0");
    }
    if args.repeats == 0 {
        anyhow::bail!("--repeats must be > 0");
    }

    let backend = default_applicator();
    eprintln!(
        "backend: {} ({} lanes), {} pixels per run",
        backend.name(),
        backend.lanes(),
        args.pixels
    );

    let mask = noise(args.pixels, 0x5EED);
    let target = noise(args.pixels, 0xF00D);
    let mut scratch = target.clone();

    if args.warmup > 0 {
        eprintln!("warmup: {} run(s)", args.warmup);
        for _ in 0..args.warmup {
            scratch.copy_from_slice(&target);
            backend.apply_luminance_mask(&mut scratch, &mask);
        }
    }

    let mut runs = Vec::with_capacity(args.repeats as usize);
    for _ in 0..args.repeats {
        let mut m = RunMetrics::default();

        scratch.copy_from_slice(&target);
        let t0 = Instant::now();
        ScalarApplicator.apply_luminance_mask(&mut scratch, &mask);
        m.scalar = t0.elapsed();
        let scalar_out = args.check.then(|| scratch.clone());

        scratch.copy_from_slice(&target);
        let t0 = Instant::now();
        backend.apply_luminance_mask(&mut scratch, &mask);
        m.default_backend = t0.elapsed();

        if let Some(expected) = scalar_out
            && expected != scratch
        {
            anyhow::bail!("{} output differs from scalar output", backend.name());
        }
        runs.push(m);
    }

    report(&runs, args.pixels, backend.name());
    Ok(())
}

fn noise(n: usize, seed: u64) -> Vec<u32> {
    (0..n as u64)
        .map(|i| {
            let mut z = seed.wrapping_add(i.wrapping_mul(0x9E37_79B9_7F4A_7C15));
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            (z ^ (z >> 31)) as u32
        })
        .collect()
}

fn parse_args() -> anyhow::Result<BenchArgs> {
    let mut args = std::env::args().skip(1);

    let mut out = BenchArgs {
        pixels: 1920 * 1080,
        warmup: 3,
        repeats: 50,
        check: false,
    };

    while let Some(a) = args.next() {
        match a.as_str() {
            "--pixels" => out.pixels = parse_flag(args.next(), "--pixels")?,
            "--warmup" => out.warmup = parse_flag(args.next(), "--warmup")?,
            "--repeats" => out.repeats = parse_flag(args.next(), "--repeats")?,
            "--check" => out.check = true,
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => anyhow::bail!("unknown arg '{a}' (try --help)"),
        }
    }

    Ok(out)
}

fn print_help() {
    eprintln!(
        r#"clipmask-bench

Masks one pixel run repeatedly with the scalar and the default backend and
reports latency percentiles and throughput for each.

Usage:
  cargo run --release -q
  cargo run --release -q -- --pixels 65536 --repeats 200 --check

Args:
  --pixels N   (default 2073600, one 1080p frame)
  --warmup N   (default 3)
  --repeats N  (default 50)
  --check      fail if the default backend output differs from scalar
"#
    );
}

fn parse_flag<T>(v: Option<String>, flag: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let v = v.ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))?;
    v.parse::<T>()
        .with_context(|| format!("parse {flag} value '{v}'"))
}

/// Sorted timings for one backend.
struct Timings(Vec<Duration>);

impl Timings {
    fn collect(runs: &[RunMetrics], pick: impl Fn(&RunMetrics) -> Duration) -> Self {
        let mut v: Vec<Duration> = runs.iter().map(pick).collect();
        v.sort_unstable();
        Self(v)
    }

    /// Nearest-rank percentile, `q` in `(0, 1]`.
    fn quantile(&self, q: f64) -> Duration {
        let n = self.0.len();
        if n == 0 {
            return Duration::ZERO;
        }
        let rank = (q * n as f64).ceil().clamp(1.0, n as f64) as usize;
        self.0[rank - 1]
    }
}

fn megapixels_per_sec(pixels: usize, d: Duration) -> f64 {
    let secs = d.as_secs_f64();
    if secs == 0.0 {
        return f64::INFINITY;
    }
    pixels as f64 / secs / 1e6
}

fn report(runs: &[RunMetrics], pixels: usize, backend: &str) {
    let scalar = Timings::collect(runs, |m| m.scalar);
    let vector = Timings::collect(runs, |m| m.default_backend);

    eprintln!("\n{} run(s), p50/p90/p99 and p50 throughput:", runs.len());
    for (name, t) in [("scalar", &scalar), (backend, &vector)] {
        let p50 = t.quantile(0.50);
        eprintln!(
            "  {name:8} {:>9.3}ms {:>9.3}ms {:>9.3}ms  {:>8.1} Mpx/s",
            p50.as_secs_f64() * 1e3,
            t.quantile(0.90).as_secs_f64() * 1e3,
            t.quantile(0.99).as_secs_f64() * 1e3,
            megapixels_per_sec(pixels, p50),
        );
    }

    let (s, v) = (scalar.quantile(0.50), vector.quantile(0.50));
    if !v.is_zero() {
        eprintln!(
            "  {backend} speedup over scalar at p50: {:.2}x",
            s.as_secs_f64() / v.as_secs_f64()
        );
    }
}
