//! Hardware-adjacent drivers shared by the platform shims.

pub mod button;
