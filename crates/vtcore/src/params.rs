//! Parameter collector.
//!
//! Splits the raw parameter bytes `vt-push-parser` hands us on a CSI/DCS
//! event into the typed parameter list spec.md §3 describes: each `;`
//! delimited field is either missing, a strictly-parsed `i32`, or (if it
//! contains a `:`) preserved verbatim as a colon-substructured string, since
//! SGR's `38:2:r:g:b` family needs the sub-tokens intact.

use smallvec::SmallVec;
use vt_push_parser::event::ParamBuf;

/// Spec.md §3: "Parameter list: up to 24 typed parameters".
pub const MAX_PARAMS: usize = 24;

/// Spec.md §3: "Parameter buffer: up to 63 printable bytes".
pub const MAX_PARAM_BYTES: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Missing,
    Number(i32),
    /// Colon-substructured parameter, preserved verbatim (e.g. `"2:10:20:30"`).
    Str(String),
}

#[derive(Debug, Clone, Default)]
pub struct ParamList {
    params: SmallVec<[Param; MAX_PARAMS]>,
}

/// Why a parameter list failed to split. Per spec.md §4.7 this drops the
/// whole sequence with no reply and no side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitError {
    TooManyParams,
    TooManyBytes,
    NonNumeric,
}

impl ParamList {
    /// Split a `vt-push-parser` parameter buffer into typed parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError`] if the buffer overflows the 24-parameter or
    /// 63-byte bounds, or if a non-colon field fails strict numeric parse.
    pub fn split(buf: ParamBuf<'_>) -> Result<Self, SplitError> {
        if buf.byte_len() > MAX_PARAM_BYTES {
            return Err(SplitError::TooManyBytes);
        }
        if buf.len() > MAX_PARAMS {
            return Err(SplitError::TooManyParams);
        }

        let mut params = SmallVec::with_capacity(buf.len());
        for field in &buf {
            if field.is_empty() {
                params.push(Param::Missing);
            } else if field.contains(&b':') {
                let s = String::from_utf8_lossy(field).into_owned();
                params.push(Param::Str(s));
            } else {
                let s = std::str::from_utf8(field).map_err(|_| SplitError::NonNumeric)?;
                let n: i32 = s.parse().map_err(|_| SplitError::NonNumeric)?;
                params.push(Param::Number(n));
            }
        }
        Ok(Self { params })
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn raw(&self, index: usize) -> Option<&Param> {
        self.params.get(index)
    }

    /// Spec.md §4.4: `get(index, min, default)`.
    ///
    /// Returns `default` if the slot is missing or absent, `min` if the
    /// numeric value is below it, the value otherwise. Returns `-1` if the
    /// slot holds a colon-substructured `Str` (the dispatcher's signal to
    /// silently ignore the whole command).
    pub fn get(&self, index: usize, min: i32, default: i32) -> i32 {
        match self.params.get(index) {
            None | Some(Param::Missing) => default,
            Some(Param::Number(n)) => (*n).max(min),
            Some(Param::Str(_)) => -1,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.params.iter()
    }
}
