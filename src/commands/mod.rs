//! Built-in commands.

mod audio;
mod fun;
mod math;
mod meta;

use crate::registry::Descriptor;

/// Every built-in command, in lookup order.
#[must_use]
pub fn builtin() -> Vec<Descriptor> {
    let mut descriptors = Vec::new();
    descriptors.extend(meta::descriptors());
    descriptors.extend(audio::descriptors());
    descriptors.extend(fun::descriptors());
    descriptors.extend(math::descriptors());
    descriptors
}
