//! Seeded coherent noise.
//!
//! Classic 2D gradient noise over a seeded permutation table, plus fractal
//! (fBm) summation and the normalization utilities the terrain and preview
//! paths share. The permutation shuffle is the only place randomness enters:
//! the same u32 seed always rebuilds the same table, so every field sampled
//! from it is reproducible bit-for-bit.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::tilemap::Tilemap;

/// Parameters controlling fBm noise field generation.
#[derive(Clone, Copy, Debug)]
pub struct NoiseParams {
    /// Feature size: larger scale, fewer and larger features.
    pub scale: f32,
    /// Number of stacked noise layers.
    pub octaves: u32,
    /// Amplitude falloff per octave.
    pub persistence: f32,
    /// Frequency growth per octave.
    pub lacunarity: f32,
    pub seed: u32,
    /// Sample-space offset, used to pan a preview without reseeding.
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            scale: 128.0,
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.0,
            seed: 1337,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

/// Smallest usable scale; smaller values are clamped, never rejected.
const MIN_SCALE: f32 = 0.0001;

/// Guard for near-zero normalization denominators.
const EPSILON: f32 = 1e-8;

/// 2D gradient noise over a seeded permutation table.
pub struct Perlin {
    // 256 entries shuffled by the seed, duplicated to 512 so the corner
    // hash never needs a wraparound branch.
    perm: [u8; 512],
}

impl Perlin {
    pub fn new(seed: u32) -> Self {
        let mut base: [u8; 256] = [0; 256];
        for (i, v) in base.iter_mut().enumerate() {
            *v = i as u8;
        }
        let mut rng = ChaCha8Rng::seed_from_u64(u64::from(seed));
        base.shuffle(&mut rng);

        let mut perm = [0u8; 512];
        for i in 0..512 {
            perm[i] = base[i & 255];
        }
        Self { perm }
    }

    /// Sample at (x, y). Output is roughly in [-1, 1].
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let xi = (x.floor() as i32 & 255) as usize;
        let yi = (y.floor() as i32 & 255) as usize;
        let xf = x - x.floor();
        let yf = y - y.floor();

        let u = fade(xf);
        let v = fade(yf);

        let aa = self.perm[usize::from(self.perm[xi]) + yi];
        let ab = self.perm[usize::from(self.perm[xi]) + yi + 1];
        let ba = self.perm[usize::from(self.perm[xi + 1]) + yi];
        let bb = self.perm[usize::from(self.perm[xi + 1]) + yi + 1];

        let x1 = lerp(grad(aa, xf, yf), grad(ba, xf - 1.0, yf), u);
        let x2 = lerp(grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0), u);

        lerp(x1, x2, v)
    }

    /// Sample remapped to [0, 1].
    pub fn sample01(&self, x: f32, y: f32) -> f32 {
        (self.sample(x, y) + 1.0) * 0.5
    }
}

/// Smoothstep-style fade curve: t^3 (t (6t - 15) + 10).
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

/// Corner gradient from the low two hash bits: the four diagonals.
fn grad(hash: u8, x: f32, y: f32) -> f32 {
    match hash & 0x3 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        _ => -x - y,
    }
}

/// Octave-summed noise in [0, 1], frequency doubling per octave.
///
/// The running sum is divided by the accumulated amplitude, so the output
/// range is independent of the octave count.
pub fn octave01(perlin: &Perlin, x: f32, y: f32, octaves: u32, persistence: f32) -> f32 {
    let mut total = 0.0;
    let mut max_value = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;

    for _ in 0..octaves {
        total += perlin.sample01(x * frequency, y * frequency) * amplitude;
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= 2.0;
    }

    if max_value <= 0.0 {
        return 0.0;
    }
    total / max_value
}

/// Generate a dense fBm field. Output values are roughly in [-1, 1].
pub fn fbm_field(width: usize, height: usize, params: &NoiseParams) -> Tilemap<f32> {
    let perlin = Perlin::new(params.seed);
    let scale = params.scale.max(MIN_SCALE);
    let mut out = Tilemap::new_with(width, height, 0.0f32);

    for y in 0..height {
        for x in 0..width {
            let mut amp = 1.0f32;
            let mut freq = 1.0f32;
            let mut sum = 0.0f32;
            let mut amp_sum = 0.0f32;

            for _ in 0..params.octaves {
                let nx = ((x as f32 + params.offset_x) / scale) * freq;
                let ny = ((y as f32 + params.offset_y) / scale) * freq;

                sum += perlin.sample(nx, ny) * amp;
                amp_sum += amp;

                amp *= params.persistence;
                freq *= params.lacunarity;
            }

            if amp_sum > 0.0 {
                sum /= amp_sum;
            }
            out.set(x, y, sum);
        }
    }

    out
}

/// Min–max normalize a field to 0..255.
pub fn normalize_to_u8(field: &Tilemap<f32>) -> Vec<u8> {
    let src = field.as_slice();
    if src.is_empty() {
        return Vec::new();
    }

    let mut mn = f32::MAX;
    let mut mx = f32::MIN;
    for &v in src {
        mn = mn.min(v);
        mx = mx.max(v);
    }
    if (mx - mn).abs() < EPSILON {
        mx = mn + EPSILON;
    }

    src.iter()
        .map(|&v| {
            let t = ((v - mn) / (mx - mn)).clamp(0.0, 1.0);
            (t * 255.0 + 0.5) as u8
        })
        .collect()
}

/// Robust terrain normalization to 0..255.
///
/// Percentile clipping ignores outliers in the noise distribution, the
/// sea-level bias shifts the midpoint before re-clamping (above 0.5 drowns
/// more of the map), and gamma is applied last to sharpen coastlines.
pub fn normalize_terrain_to_u8(
    field: &Tilemap<f32>,
    clip_low: f32,
    clip_high: f32,
    sea_level: f32,
    gamma: f32,
) -> Vec<u8> {
    let src = field.as_slice();
    if src.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<f32> = src.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let last = sorted.len() - 1;
    let idx_of = |p: f32| -> usize {
        let p = p.clamp(0.0, 1.0);
        ((p * last as f32) + 0.5) as usize
    };
    let lo = sorted[idx_of(clip_low)];
    let mut hi = sorted[idx_of(clip_high)];
    if (hi - lo).abs() < EPSILON {
        hi = lo + EPSILON;
    }

    let bias = sea_level - 0.5;

    src.iter()
        .map(|&v| {
            let t = ((v - lo) / (hi - lo)).clamp(0.0, 1.0);
            let t = (t - bias).clamp(0.0, 1.0);
            let t = t.powf(gamma);
            (t * 255.0 + 0.5) as u8
        })
        .collect()
}

/// Expand grayscale bytes to RGBA8888 for texture upload.
pub fn gray_to_rgba(gray: &[u8]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(gray.len() * 4);
    for &g in gray {
        rgba.extend_from_slice(&[g, g, g, 255]);
    }
    rgba
}
