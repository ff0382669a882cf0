//! Adaptive patch application
//!
//! A patch built for one dump of a game is often applied to a slightly
//! different dump: one carrying another iNES header, another program
//! revision, or a 512-byte copier header in front of the data. When a direct
//! application fails because the source is not the one the patch expects,
//! [`adaptive_apply`] repairs the source in a few well-known ways and tries
//! again.
//!
//! The strategies run in a fixed order and the first success wins:
//!
//! 1. Apply the patch as-is.
//! 2. If the patch targets a dump in the known-file table, replace the
//!    source's header with the expected one, or convert the source to the
//!    expected revision first.
//! 3. Strip a copier header, apply, and put the header back in front of the
//!    result.
//!
//! If every strategy fails, the error from the first attempt is returned.
//! Only "wrong input" failures are worked around; a malformed or corrupt
//! patch fails immediately.

use crate::error::Result;
use crate::known_files::{KnownFileFamily, smb2, unheadered_checksum};
use crate::patch::{apply, expected_source_checksum};

/// Size of the header SNES copier devices put in front of a dump
pub const COPIER_HEADER_SIZE: usize = 512;

/// Which repair strategies [`adaptive_apply`] may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdaptiveOptions {
    /// Repair headers and revisions of known files
    pub try_smb2: bool,
    /// Strip a copier header from the source
    pub try_smc: bool,
}

impl AdaptiveOptions {
    /// Options with every strategy disabled
    ///
    /// [`adaptive_apply`] then behaves exactly like [`apply`].
    pub const fn strict() -> Self {
        Self {
            try_smb2: false,
            try_smc: false,
        }
    }

    /// Enable or disable known-file repair
    #[must_use]
    pub const fn with_smb2(mut self, enabled: bool) -> Self {
        self.try_smb2 = enabled;
        self
    }

    /// Enable or disable copier header stripping
    #[must_use]
    pub const fn with_smc(mut self, enabled: bool) -> Self {
        self.try_smc = enabled;
        self
    }
}

impl Default for AdaptiveOptions {
    fn default() -> Self {
        Self {
            try_smb2: true,
            try_smc: true,
        }
    }
}

/// Apply a patch, repairing the source if it does not match
///
/// Uses the built-in Super Mario Bros. 2 table for known-file repair.
///
/// # Arguments
///
/// * `source` - The file to patch
/// * `patch` - The BPS patch
/// * `options` - Which repair strategies to try
///
/// # Returns
///
/// The patched file. With a copier header stripped, the header is kept in
/// front of the output.
///
/// # Errors
///
/// Returns the error of the direct attempt when no strategy succeeds, or
/// the first error that is not a wrong-input error.
///
/// # Examples
///
/// ```rust,no_run
/// use rom_bps::{AdaptiveOptions, adaptive_apply};
///
/// let source = std::fs::read("Super Mario Bros. 2 (USA).nes")?;
/// let patch = std::fs::read("hack.bps")?;
/// let target = adaptive_apply(&source, &patch, AdaptiveOptions::default())?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn adaptive_apply(source: &[u8], patch: &[u8], options: AdaptiveOptions) -> Result<Vec<u8>> {
    adaptive_apply_with(source, patch, options, &smb2::SMB2)
}

/// Apply a patch, using `family` for known-file repair
///
/// Same as [`adaptive_apply`] with a caller-supplied table.
pub fn adaptive_apply_with(
    source: &[u8],
    patch: &[u8],
    options: AdaptiveOptions,
    family: &KnownFileFamily<'_>,
) -> Result<Vec<u8>> {
    let original = match apply(source, patch) {
        Ok(target) => return Ok(target),
        Err(err) if err.is_wrong_input() => err,
        Err(err) => return Err(err),
    };

    log::debug!("Direct application failed: {original}");

    if options.try_smb2 {
        if let Some(target) = repair_known_file(source, patch, family)? {
            return Ok(target);
        }
    }

    if options.try_smc {
        if let Some(target) = strip_copier_header(source, patch)? {
            return Ok(target);
        }
    }

    Err(original)
}

/// Keep successes and hard failures, turn wrong-input failures into `None`
fn retry(what: &str, result: Result<Vec<u8>>) -> Result<Option<Vec<u8>>> {
    match result {
        Ok(target) => {
            log::info!("Patch applied after {what}");
            Ok(Some(target))
        }
        Err(err) if err.is_wrong_input() => {
            log::debug!("{what} did not help: {err}");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn repair_known_file(
    source: &[u8],
    patch: &[u8],
    family: &KnownFileFamily<'_>,
) -> Result<Option<Vec<u8>>> {
    // A patch too short to carry a footer cannot name a known dump.
    let Ok(required_checksum) = expected_source_checksum(patch) else {
        return Ok(None);
    };
    let Some(required) = family.lookup(required_checksum) else {
        return Ok(None);
    };

    let source_checksum = unheadered_checksum(source);
    if source_checksum == required.unheadered_checksum {
        log::debug!("Source is {} with a different header", required.name);
        return retry("header repair", apply(&required.reheader(source), patch));
    }

    let Some(current) = family
        .versions
        .iter()
        .map(|(_, version)| version)
        .find(|version| {
            version.revision != required.revision && version.unheadered_checksum == source_checksum
        })
    else {
        return Ok(None);
    };

    let Some(conversion) = family.conversion(current.revision, required.revision) else {
        log::warn!(
            "Source is {} {} but the patch needs {}; no conversion patch is available",
            family.name,
            current.revision,
            required.revision
        );
        return Ok(None);
    };
    let Some(canonical) = family.canonical(current.revision) else {
        return Ok(None);
    };

    log::debug!(
        "Converting {} from {} to {}",
        family.name,
        current.revision,
        required.revision
    );

    let Some(converted) = retry(
        "revision conversion",
        apply(&canonical.reheader(source), conversion),
    )?
    else {
        return Ok(None);
    };

    retry(
        "revision conversion",
        apply(&required.reheader(&converted), patch),
    )
}

fn strip_copier_header(source: &[u8], patch: &[u8]) -> Result<Option<Vec<u8>>> {
    let (header, body) = source.split_at(source.len().min(COPIER_HEADER_SIZE));

    let Some(target) = retry("copier header removal", apply(body, patch))? else {
        return Ok(None);
    };

    let mut output = Vec::with_capacity(header.len() + target.len());
    output.extend_from_slice(header);
    output.extend_from_slice(&target);
    Ok(Some(output))
}
