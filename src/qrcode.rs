//! QR Code Model 2 encoding.
//!
//! This module turns a text payload and an error correction level into an
//! owned [`ModuleGrid`]: a square matrix of dark/light modules covering
//! versions 1 to 40. Payloads are encoded in standard byte mode; the
//! smallest version whose data capacity holds the payload at the requested
//! level is selected automatically. Mask selection scores all eight mask
//! patterns with the standard penalty rules and keeps the first minimum,
//! so encoding is fully deterministic.

use crate::error::EncodeError;

/// Number of background-colored modules required around the symbol for
/// reliable scanning.
pub const QUIET_ZONE: u32 = 4;

/// Error correction level for a QR code.
///
/// Each level reserves a fraction of the symbol for Reed-Solomon error
/// correction codewords, which is also the fraction of modules that may be
/// damaged or obscured (for example by a logo overlay) while the payload
/// still decodes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Ecc {
    /// Tolerates ~7% erroneous codewords.
    Low,
    /// Tolerates ~15% erroneous codewords.
    Medium,
    /// Tolerates ~25% erroneous codewords.
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    High,
}

impl Ecc {
    /// Resolves a single-letter level code.
    ///
    /// The codes `L`, `M`, `Q` and `H` are case-sensitive. Anything else,
    /// including lowercase letters, falls back to [`Ecc::High`] so that an
    /// unrecognized code can only make the symbol more robust, never less.
    pub fn from_code(code: &str) -> Self {
        match code {
            "L" => Ecc::Low,
            "M" => Ecc::Medium,
            "Q" => Ecc::Quartile,
            _ => Ecc::High,
        }
    }

    /// Returns the canonical single-letter code for this level.
    pub fn code(self) -> &'static str {
        match self {
            Ecc::Low => "L",
            Ecc::Medium => "M",
            Ecc::Quartile => "Q",
            Ecc::High => "H",
        }
    }

    /// Approximate fraction of codewords that may be damaged while the
    /// symbol remains decodable.
    pub fn tolerance(self) -> f32 {
        match self {
            Ecc::Low => 0.07,
            Ecc::Medium => 0.15,
            Ecc::Quartile => 0.25,
            Ecc::High => 0.30,
        }
    }

    fn ordinal(self) -> usize {
        match self {
            Ecc::Low => 0,
            Ecc::Medium => 1,
            Ecc::Quartile => 2,
            Ecc::High => 3,
        }
    }

    fn format_bits(self) -> u8 {
        match self {
            Ecc::Low => 1,
            Ecc::Medium => 0,
            Ecc::Quartile => 3,
            Ecc::High => 2,
        }
    }
}

/// A QR code version (1-40). The side length of a symbol is
/// `version * 4 + 17` modules.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported by QR Code Model 2.
    pub const MIN: Version = Version(1);

    /// The maximum version number supported by QR Code Model 2.
    pub const MAX: Version = Version(40);

    /// Creates a version object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [1, 40].
    pub const fn new(ver: u8) -> Self {
        assert!(
            Version::MIN.0 <= ver && ver <= Version::MAX.0,
            "Version number out of range"
        );
        Self(ver)
    }

    /// Returns the version number, in the range [1, 40].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Side length of a symbol of this version, in modules.
    pub const fn side(self) -> i32 {
        self.0 as i32 * 4 + 17
    }
}

/// A finished QR symbol: a square matrix of dark (`true`) and light
/// (`false`) modules. Immutable once encoding completes.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ModuleGrid {
    size: i32,
    modules: Vec<bool>,
}

impl ModuleGrid {
    /// Side length in modules, between 21 and 177.
    pub fn size(&self) -> i32 {
        self.size
    }

    /// The version this grid was encoded at.
    pub fn version(&self) -> Version {
        Version::new(((self.size - 17) / 4) as u8)
    }

    /// Returns the color of the module at the given coordinates: `true`
    /// for dark. Coordinates outside the grid read as light, which makes
    /// quiet-zone rendering a plain bounds overshoot.
    pub fn module(&self, x: i32, y: i32) -> bool {
        let range = 0..self.size;
        range.contains(&x) && range.contains(&y) && self.modules[(y * self.size + x) as usize]
    }
}

/// Encodes a text payload into a QR symbol at the requested error
/// correction level.
///
/// The payload is encoded in byte mode and the smallest version that fits
/// it at `ecc` is chosen automatically. The requested level is honored
/// exactly; it is never silently raised or lowered. An empty payload is
/// well-defined and produces a minimal version-1 grid.
///
/// # Errors
///
/// Returns [`EncodeError::DataOverCapacity`] when the payload does not fit
/// even at version 40.
///
/// # Example
///
/// ```
/// use qrbrand::qrcode::{encode, Ecc};
///
/// let grid = encode("https://example.com", Ecc::High).unwrap();
/// assert_eq!(grid.size(), 29); // version 3
/// ```
pub fn encode(payload: &str, ecc: Ecc) -> Result<ModuleGrid, EncodeError> {
    let data = payload.as_bytes();

    // Find the minimal version whose data capacity holds the byte-mode
    // header plus the payload.
    let mut version = Version::MIN;
    let capacity_bits = loop {
        let capacity = num_data_codewords(version, ecc) * 8;
        match byte_mode_bits(data.len(), version) {
            Some(needed) if needed <= capacity => break capacity,
            _ if version == Version::MAX => {
                let needed = byte_mode_bits(data.len(), Version::MAX).unwrap_or(usize::MAX);
                return Err(EncodeError::DataOverCapacity {
                    needed,
                    available: capacity,
                });
            }
            _ => version = Version::new(version.value() + 1),
        }
    };

    // Byte-mode segment: mode indicator, character count, payload bytes.
    let mut bits = BitBuffer::new();
    bits.append(0x4, 4);
    bits.append(data.len() as u32, char_count_bits(version));
    for &b in data {
        bits.append(u32::from(b), 8);
    }

    // Terminator, byte alignment, then alternating pad codewords.
    let terminator = capacity_bits - bits.len();
    bits.append(0, terminator.min(4) as u8);
    bits.append(0, (bits.len().wrapping_neg() & 7) as u8);
    for &pad in [0xec, 0x11].iter().cycle() {
        if bits.len() >= capacity_bits {
            break;
        }
        bits.append(pad, 8);
    }
    let codewords = bits.into_bytes();

    let all_codewords = add_ecc_and_interleave(&codewords, version, ecc);

    let mut matrix = Matrix::new(version);
    matrix.draw_function_patterns(ecc);
    matrix.draw_codewords(&all_codewords);

    // Score every mask and keep the first minimum; ties break toward the
    // lower mask number, so the choice is deterministic.
    let mut best_mask = Mask::new(0);
    let mut min_penalty = i32::MAX;
    for m in 0..8 {
        let mask = Mask::new(m);
        matrix.apply_mask(mask);
        matrix.draw_format_bits(ecc, mask);
        let penalty = matrix.penalty_score();
        if penalty < min_penalty {
            best_mask = mask;
            min_penalty = penalty;
        }
        matrix.apply_mask(mask); // XOR undoes itself
    }
    matrix.apply_mask(best_mask);
    matrix.draw_format_bits(ecc, best_mask);

    Ok(ModuleGrid {
        size: matrix.size,
        modules: matrix.modules,
    })
}

/// Bits needed to encode `len` payload bytes in byte mode at `version`,
/// or `None` when the character count field cannot represent `len`.
fn byte_mode_bits(len: usize, version: Version) -> Option<usize> {
    let cc = char_count_bits(version);
    if len >= 1usize << cc {
        return None;
    }
    len.checked_mul(8).map(|n| n + 4 + usize::from(cc))
}

/// Width of the byte-mode character count field at the given version.
fn char_count_bits(version: Version) -> u8 {
    if version.value() <= 9 {
        8
    } else {
        16
    }
}

fn num_raw_data_modules(version: Version) -> usize {
    let ver = usize::from(version.value());
    let mut result: usize = (16 * ver + 128) * ver + 64;
    if ver >= 2 {
        let numalign: usize = ver / 7 + 2;
        result -= (25 * numalign - 10) * numalign - 55;
        if ver >= 7 {
            result -= 36;
        }
    }
    result
}

fn num_data_codewords(version: Version, ecc: Ecc) -> usize {
    num_raw_data_modules(version) / 8
        - table_get(&ECC_CODEWORDS_PER_BLOCK, version, ecc)
            * table_get(&NUM_ERROR_CORRECTION_BLOCKS, version, ecc)
}

fn table_get(table: &'static [[i8; 41]; 4], version: Version, ecc: Ecc) -> usize {
    table[ecc.ordinal()][usize::from(version.value())] as usize
}

/// Splits the data codewords into Reed-Solomon blocks, computes the error
/// correction codewords for each, and interleaves everything into the
/// final codeword sequence.
fn add_ecc_and_interleave(data: &[u8], version: Version, ecc: Ecc) -> Vec<u8> {
    assert_eq!(data.len(), num_data_codewords(version, ecc));
    let num_blocks = table_get(&NUM_ERROR_CORRECTION_BLOCKS, version, ecc);
    let block_ecc_len = table_get(&ECC_CODEWORDS_PER_BLOCK, version, ecc);
    let raw_codewords = num_raw_data_modules(version) / 8;
    let num_short_blocks = num_blocks - raw_codewords % num_blocks;
    let short_block_data_len = raw_codewords / num_blocks - block_ecc_len;

    let rs = ReedSolomonGenerator::new(block_ecc_len);
    let mut result = vec![0u8; raw_codewords];
    let mut dat = data;
    for i in 0..num_blocks {
        let dat_len = short_block_data_len + usize::from(i >= num_short_blocks);
        let ecc_codewords = rs.remainder(&dat[..dat_len]);
        let mut k = i;
        for (j, &byte) in dat[..dat_len].iter().enumerate() {
            if j == short_block_data_len {
                k -= num_short_blocks;
            }
            result[k] = byte;
            k += num_blocks;
        }
        let mut k = data.len() + i;
        for &byte in &ecc_codewords {
            result[k] = byte;
            k += num_blocks;
        }
        dat = &dat[dat_len..];
    }
    debug_assert!(dat.is_empty());
    result
}

/// An appendable sequence of bits, converted to MSB-first bytes at the end.
struct BitBuffer(Vec<bool>);

impl BitBuffer {
    fn new() -> Self {
        Self(Vec::new())
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn append(&mut self, val: u32, len: u8) {
        assert!(len <= 31 && (val >> len) == 0);
        for i in (0..len).rev() {
            self.0.push((val >> i) & 1 != 0);
        }
    }

    fn into_bytes(self) -> Vec<u8> {
        assert_eq!(self.0.len() % 8, 0);
        self.0
            .chunks(8)
            .map(|byte| byte.iter().fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit)))
            .collect()
    }
}

struct ReedSolomonGenerator {
    divisor: Vec<u8>,
}

impl ReedSolomonGenerator {
    fn new(degree: usize) -> Self {
        assert!((1..=30).contains(&degree), "Degree out of range");
        // Build the generator polynomial (x - r^0)(x - r^1)...(x - r^{deg-1}).
        let mut divisor = vec![0u8; degree];
        divisor[degree - 1] = 1;
        let mut root: u8 = 1;
        for _ in 0..degree {
            for j in 0..degree {
                divisor[j] = Self::multiply(divisor[j], root);
                if j + 1 < degree {
                    divisor[j] ^= divisor[j + 1];
                }
            }
            root = Self::multiply(root, 0x02);
        }
        Self { divisor }
    }

    fn remainder(&self, data: &[u8]) -> Vec<u8> {
        let mut result = vec![0u8; self.divisor.len()];
        for &b in data {
            let factor: u8 = b ^ result[0];
            result.rotate_left(1);
            *result.last_mut().unwrap() = 0;
            for (x, &y) in result.iter_mut().zip(self.divisor.iter()) {
                *x ^= Self::multiply(y, factor);
            }
        }
        result
    }

    // Multiplication in GF(2^8) with the QR reducing polynomial 0x11D.
    fn multiply(x: u8, y: u8) -> u8 {
        let mut z: u8 = 0;
        for i in (0..8).rev() {
            z = (z << 1) ^ ((z >> 7) * 0x1d);
            z ^= ((y >> i) & 1) * x;
        }
        z
    }
}

/// A mask pattern (0-7).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
struct Mask(u8);

impl Mask {
    fn new(mask: u8) -> Self {
        assert!(mask <= 7, "Mask value out of range");
        Self(mask)
    }

    fn value(self) -> u8 {
        self.0
    }
}

/// Work-in-progress symbol: module colors plus a parallel map of which
/// cells belong to function patterns (and therefore must not be masked or
/// overwritten by data).
struct Matrix {
    size: i32,
    modules: Vec<bool>,
    is_function: Vec<bool>,
}

impl Matrix {
    fn new(version: Version) -> Self {
        let size = version.side();
        let len = (size * size) as usize;
        Self {
            size,
            modules: vec![false; len],
            is_function: vec![false; len],
        }
    }

    fn index(&self, x: i32, y: i32) -> usize {
        debug_assert!((0..self.size).contains(&x) && (0..self.size).contains(&y));
        (y * self.size + x) as usize
    }

    fn get(&self, x: i32, y: i32) -> bool {
        self.modules[self.index(x, y)]
    }

    fn set(&mut self, x: i32, y: i32, dark: bool) {
        let i = self.index(x, y);
        self.modules[i] = dark;
    }

    fn set_function(&mut self, x: i32, y: i32, dark: bool) {
        let i = self.index(x, y);
        self.modules[i] = dark;
        self.is_function[i] = true;
    }

    fn draw_function_patterns(&mut self, ecc: Ecc) {
        for i in 0..self.size {
            self.set_function(6, i, i % 2 == 0);
            self.set_function(i, 6, i % 2 == 0);
        }

        self.draw_finder_pattern(3, 3);
        self.draw_finder_pattern(self.size - 4, 3);
        self.draw_finder_pattern(3, self.size - 4);

        let positions = self.alignment_pattern_positions();
        let last = positions.len().wrapping_sub(1);
        for (i, &px) in positions.iter().enumerate() {
            for (j, &py) in positions.iter().enumerate() {
                // The three corners overlapping finder patterns are skipped.
                if (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0) {
                    continue;
                }
                self.draw_alignment_pattern(px, py);
            }
        }

        // Reserve the format cells now; the real bits land after masking.
        self.draw_format_bits(ecc, Mask::new(0));
        self.draw_version_info();
    }

    fn draw_finder_pattern(&mut self, x: i32, y: i32) {
        for dy in -4..=4 {
            for dx in -4..=4 {
                let (xx, yy) = (x + dx, y + dy);
                if (0..self.size).contains(&xx) && (0..self.size).contains(&yy) {
                    let dist: i32 = dx.abs().max(dy.abs());
                    self.set_function(xx, yy, dist != 2 && dist != 4);
                }
            }
        }
    }

    fn draw_alignment_pattern(&mut self, x: i32, y: i32) {
        for dy in -2..=2 {
            for dx in -2..=2 {
                self.set_function(x + dx, y + dy, dx.abs().max(dy.abs()) != 1);
            }
        }
    }

    fn alignment_pattern_positions(&self) -> Vec<i32> {
        let ver = i32::from(self.version().value());
        if ver == 1 {
            return Vec::new();
        }
        let numalign = ver / 7 + 2;
        let step = if ver == 32 {
            26
        } else {
            (ver * 4 + numalign * 2 + 1) / (numalign * 2 - 2) * 2
        };
        let mut result = Vec::with_capacity(numalign as usize);
        let mut pos = self.size - 7;
        for _ in 0..numalign - 1 {
            result.push(pos);
            pos -= step;
        }
        result.push(6);
        result.reverse();
        result
    }

    fn draw_format_bits(&mut self, ecc: Ecc, mask: Mask) {
        let bits: u32 = {
            let data = u32::from((ecc.format_bits() << 3) | mask.value());
            let mut rem: u32 = data;
            for _ in 0..10 {
                rem = (rem << 1) ^ ((rem >> 9) * 0x537);
            }
            ((data << 10) | rem) ^ 0x5412
        };

        // First copy, around the top-left finder pattern.
        for i in 0..6 {
            self.set_function(8, i, get_bit(bits, i as u8));
        }
        self.set_function(8, 7, get_bit(bits, 6));
        self.set_function(8, 8, get_bit(bits, 7));
        self.set_function(7, 8, get_bit(bits, 8));
        for i in 9..15 {
            self.set_function(14 - i, 8, get_bit(bits, i as u8));
        }

        // Second copy, split between the other two finder patterns.
        for i in 0..8 {
            self.set_function(self.size - 1 - i, 8, get_bit(bits, i as u8));
        }
        for i in 8..15 {
            self.set_function(8, self.size - 15 + i, get_bit(bits, i as u8));
        }
        self.set_function(8, self.size - 8, true); // always-dark module
    }

    fn draw_version_info(&mut self) {
        let ver = u32::from(self.version().value());
        if ver < 7 {
            return;
        }
        let bits: u32 = {
            let mut rem: u32 = ver;
            for _ in 0..12 {
                rem = (rem << 1) ^ ((rem >> 11) * 0x1f25);
            }
            (ver << 12) | rem
        };
        for i in 0..18i32 {
            let bit = get_bit(bits, i as u8);
            let a = self.size - 11 + i % 3;
            let b = i / 3;
            self.set_function(a, b, bit);
            self.set_function(b, a, bit);
        }
    }

    /// Places all codewords into the non-function cells in the standard
    /// two-column zigzag order.
    fn draw_codewords(&mut self, data: &[u8]) {
        let mut i: usize = 0;
        let mut right = self.size - 1;
        while right >= 1 {
            if right == 6 {
                right = 5;
            }
            for vert in 0..self.size {
                for j in 0..2 {
                    let x = right - j;
                    let upward = (right + 1) & 2 == 0;
                    let y = if upward { self.size - 1 - vert } else { vert };
                    if !self.is_function[self.index(x, y)] && i < data.len() * 8 {
                        self.set(x, y, get_bit(data[i >> 3].into(), 7 - (i as u8 & 7)));
                        i += 1;
                    }
                    // Any cells left over stay light as remainder bits.
                }
            }
            right -= 2;
        }
        debug_assert_eq!(i, data.len() * 8);
    }

    fn apply_mask(&mut self, mask: Mask) {
        for y in 0..self.size {
            for x in 0..self.size {
                if self.is_function[self.index(x, y)] {
                    continue;
                }
                let invert = match mask.value() {
                    0 => (x + y) % 2 == 0,
                    1 => y % 2 == 0,
                    2 => x % 3 == 0,
                    3 => (x + y) % 3 == 0,
                    4 => (x / 3 + y / 2) % 2 == 0,
                    5 => (x * y) % 2 + (x * y) % 3 == 0,
                    6 => ((x * y) % 2 + (x * y) % 3) % 2 == 0,
                    7 => ((x + y) % 2 + (x * y) % 3) % 2 == 0,
                    _ => unreachable!(),
                };
                let current = self.get(x, y);
                self.set(x, y, current ^ invert);
            }
        }
    }

    /// Standard penalty score: long same-color runs, 2x2 blocks, patterns
    /// resembling finders, and dark/light imbalance.
    fn penalty_score(&self) -> i32 {
        let mut result: i32 = 0;
        let size = self.size;

        for y in 0..size {
            let mut run_color = false;
            let mut run_x: i32 = 0;
            let mut history = FinderPenalty::new(size);
            for x in 0..size {
                if self.get(x, y) == run_color {
                    run_x += 1;
                    if run_x == 5 {
                        result += PENALTY_N1;
                    } else if run_x > 5 {
                        result += 1;
                    }
                } else {
                    history.add_history(run_x);
                    if !run_color {
                        result += history.count_patterns() * PENALTY_N3;
                    }
                    run_color = self.get(x, y);
                    run_x = 1;
                }
            }
            result += history.terminate_and_count(run_color, run_x) * PENALTY_N3;
        }
        for x in 0..size {
            let mut run_color = false;
            let mut run_y: i32 = 0;
            let mut history = FinderPenalty::new(size);
            for y in 0..size {
                if self.get(x, y) == run_color {
                    run_y += 1;
                    if run_y == 5 {
                        result += PENALTY_N1;
                    } else if run_y > 5 {
                        result += 1;
                    }
                } else {
                    history.add_history(run_y);
                    if !run_color {
                        result += history.count_patterns() * PENALTY_N3;
                    }
                    run_color = self.get(x, y);
                    run_y = 1;
                }
            }
            result += history.terminate_and_count(run_color, run_y) * PENALTY_N3;
        }

        for y in 0..size - 1 {
            for x in 0..size - 1 {
                let color = self.get(x, y);
                if color == self.get(x + 1, y)
                    && color == self.get(x, y + 1)
                    && color == self.get(x + 1, y + 1)
                {
                    result += PENALTY_N2;
                }
            }
        }

        let dark = self.modules.iter().filter(|&&m| m).count() as i32;
        let total = size * size;
        // Each 5% deviation from a 50% dark ratio costs PENALTY_N4.
        let k = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
        result += k * PENALTY_N4;
        result
    }

    fn version(&self) -> Version {
        Version::new(((self.size - 17) / 4) as u8)
    }
}

/// Sliding run-length history for detecting finder-like patterns during
/// penalty scoring.
struct FinderPenalty {
    size: i32,
    run_history: [i32; 7],
}

impl FinderPenalty {
    fn new(size: i32) -> Self {
        Self {
            size,
            run_history: [0; 7],
        }
    }

    fn add_history(&mut self, mut current_run_length: i32) {
        if self.run_history[0] == 0 {
            // Treat the leading border as light.
            current_run_length += self.size;
        }
        self.run_history.rotate_right(1);
        self.run_history[0] = current_run_length;
    }

    fn count_patterns(&self) -> i32 {
        let rh = &self.run_history;
        let n = rh[1];
        i32::from(
            n > 0
                && rh[2] == n
                && rh[3] == n * 3
                && rh[4] == n
                && rh[5] == n
                && (rh[0] >= n * 4 || rh[6] >= n * 4),
        )
    }

    fn terminate_and_count(mut self, current_run_color: bool, mut current_run_length: i32) -> i32 {
        if current_run_color {
            self.add_history(current_run_length);
            current_run_length = 0;
        }
        current_run_length += self.size;
        self.add_history(current_run_length);
        self.count_patterns()
    }
}

const PENALTY_N1: i32 = 3;
const PENALTY_N2: i32 = 3;
const PENALTY_N3: i32 = 40;
const PENALTY_N4: i32 = 10;

fn get_bit(x: u32, i: u8) -> bool {
    (x >> i) & 1 != 0
}

static ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

static NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_is_version_one() {
        let grid = encode("", Ecc::High).unwrap();
        assert_eq!(grid.size(), 21);
        assert_eq!(grid.version(), Version::new(1));
    }

    #[test]
    fn example_url_fits_version_three_at_high() {
        let grid = encode("https://example.com", Ecc::High).unwrap();
        assert_eq!(grid.version(), Version::new(3));
        assert_eq!(grid.size(), 29);
    }

    #[test]
    fn min_version_grows_with_level() {
        let payload = "a".repeat(120);
        let low = encode(&payload, Ecc::Low).unwrap();
        let high = encode(&payload, Ecc::High).unwrap();
        assert!(high.version() >= low.version());
        assert!(high.size() > low.size());
    }

    #[test]
    fn unknown_level_code_falls_back_to_high() {
        assert_eq!(Ecc::from_code("Z"), Ecc::High);
        assert_eq!(Ecc::from_code(""), Ecc::High);
        // The contract is case-sensitive: lowercase codes are unrecognized.
        assert_eq!(Ecc::from_code("l"), Ecc::High);
        assert_eq!(Ecc::from_code("L"), Ecc::Low);
        assert_eq!(Ecc::from_code("M"), Ecc::Medium);
        assert_eq!(Ecc::from_code("Q"), Ecc::Quartile);
        assert_eq!(Ecc::from_code("H"), Ecc::High);
    }

    #[test]
    fn oversize_payload_is_rejected() {
        let payload = "a".repeat(3000);
        match encode(&payload, Ecc::High) {
            Err(EncodeError::DataOverCapacity { needed, available }) => {
                assert!(needed > available);
            }
            other => panic!("expected DataOverCapacity, got {other:?}"),
        }
    }

    #[test]
    fn function_patterns_are_present() {
        let grid = encode("hello", Ecc::Medium).unwrap();
        // Finder pattern corner and center are dark.
        assert!(grid.module(0, 0));
        assert!(grid.module(3, 3));
        // The always-dark module next to the bottom-left finder.
        assert!(grid.module(8, grid.size() - 8));
    }

    #[test]
    fn out_of_bounds_reads_light() {
        let grid = encode("hello", Ecc::Low).unwrap();
        assert!(!grid.module(-1, 0));
        assert!(!grid.module(0, -1));
        assert!(!grid.module(grid.size(), 0));
        assert!(!grid.module(0, grid.size()));
    }

    #[test]
    fn encoding_is_deterministic() {
        let a = encode("https://example.com/some/path?q=1", Ecc::Quartile).unwrap();
        let b = encode("https://example.com/some/path?q=1", Ecc::Quartile).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn quiet_zone_is_four_modules() {
        assert_eq!(QUIET_ZONE, 4);
    }
}
