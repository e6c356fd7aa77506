//! Small numeric helpers shared by the pricing modules.

pub mod decimal_utils;
