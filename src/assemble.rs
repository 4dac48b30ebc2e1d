//! Positional argument assembly for the set path.
//!
//! One caller-supplied value is inserted at the variable slot among the
//! channel's static inputs. `slot == statics.len()` appends; anything
//! larger is rejected before dispatch.

use crate::error::{Error, Result};
use crate::value::ChannelValue;

/// Build the final ordered argument list:
/// `statics[..slot] ++ [value] ++ statics[slot..]`.
pub fn assemble_args(
    var_slot: usize,
    value: ChannelValue,
    statics: &[ChannelValue],
) -> Result<Vec<ChannelValue>> {
    if var_slot > statics.len() {
        return Err(Error::SlotOutOfRange {
            slot: var_slot,
            statics: statics.len(),
        });
    }
    let mut args = Vec::with_capacity(statics.len() + 1);
    args.extend_from_slice(&statics[..var_slot]);
    args.push(value);
    args.extend_from_slice(&statics[var_slot..]);
    Ok(args)
}
