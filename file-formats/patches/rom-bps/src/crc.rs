//! CRC-32 (IEEE 802.3) checksums
//!
//! BPS stores the CRC-32 of the source, the target and the patch itself in its
//! footer. The same checksum is used to recognize known ROM revisions.

/// Reflected form of the CRC-32 polynomial 0x04C11DB7
const POLYNOMIAL: u32 = 0xEDB8_8320;

/// Byte-at-a-time lookup table, evaluated at compile time
static CRC_TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            c = if c & 1 != 0 {
                POLYNOMIAL ^ (c >> 1)
            } else {
                c >> 1
            };
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

/// Incremental CRC-32 hasher
///
/// ```
/// use rom_bps::Crc32;
///
/// let mut hasher = Crc32::new();
/// hasher.update(b"123");
/// hasher.update(b"456789");
/// assert_eq!(hasher.finalize(), 0xCBF4_3926);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Crc32 {
    state: u32,
}

impl Crc32 {
    /// Start a new checksum
    pub const fn new() -> Self {
        Self { state: u32::MAX }
    }

    /// Feed more bytes into the checksum
    pub fn update(&mut self, bytes: &[u8]) {
        let mut crc = self.state;
        for &byte in bytes {
            crc = (crc >> 8) ^ CRC_TABLE[((crc ^ u32::from(byte)) & 0xFF) as usize];
        }
        self.state = crc;
    }

    /// Finish the checksum
    pub const fn finalize(self) -> u32 {
        self.state ^ u32::MAX
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the CRC-32 of a buffer
pub fn crc32(bytes: &[u8]) -> u32 {
    let mut hasher = Crc32::new();
    hasher.update(bytes);
    hasher.finalize()
}
