//! Battery capacity estimation from a cell-voltage reading.
//!
//! Piecewise-linear interpolation over a voltage→capacity discharge table.
//! The table is ordered by strictly descending voltage: the first row is the
//! "full" reference point, the last row the "empty" floor. Inputs above the
//! table clamp to the first row's capacity, inputs below it to the last
//! row's.
//!
//! All arithmetic is integer; interpolation truncates toward zero. The
//! protocol unit downstream is half a percent, coarser than the truncation
//! error.

use crate::error::Error;

/// One row of a discharge curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoltageCapacityPair {
    /// Cell voltage in millivolts.
    pub voltage_mv: u16,
    /// Remaining capacity in percent (0–100).
    pub capacity_pct: u8,
}

const fn pair(voltage_mv: u16, capacity_pct: u8) -> VoltageCapacityPair {
    VoltageCapacityPair {
        voltage_mv,
        capacity_pct,
    }
}

/// NiMH AA discharge curve, measured against the cell this hardware ships
/// with. Flat through the mid-range, then a steep knee below 1.25 V.
pub const NIMH_AA_PAIRS: &[VoltageCapacityPair] = &[
    pair(1450, 100),
    pair(1350, 92),
    pair(1300, 78),
    pair(1250, 24),
    pair(1220, 13),
    pair(1160, 5),
    pair(1100, 2),
    pair(900, 0),
];

/// A validated voltage→capacity reference curve.
#[derive(Debug, Clone, Copy)]
pub struct CapacityCurve {
    pairs: &'static [VoltageCapacityPair],
}

impl CapacityCurve {
    /// Validate and wrap a discharge table.
    ///
    /// The table must have at least two rows, be strictly descending in
    /// voltage, and non-increasing in capacity; anything else is a
    /// construction-time fatal condition, never checked again at estimation
    /// time.
    pub fn new(pairs: &'static [VoltageCapacityPair]) -> Result<Self, Error> {
        if pairs.len() < 2 {
            return Err(Error::Config("capacity table needs at least two rows"));
        }
        for window in pairs.windows(2) {
            if window[1].voltage_mv >= window[0].voltage_mv {
                return Err(Error::Config("capacity table voltages must strictly descend"));
            }
            if window[1].capacity_pct > window[0].capacity_pct {
                return Err(Error::Config("capacity table capacities must not increase"));
            }
        }
        Ok(Self { pairs })
    }

    /// The built-in NiMH AA curve.
    pub fn nimh_aa() -> Self {
        // NIMH_AA_PAIRS is validated by a unit test; skip the runtime check.
        Self {
            pairs: NIMH_AA_PAIRS,
        }
    }

    /// Map a voltage reading to remaining capacity in percent.
    ///
    /// Scans from the highest-voltage row down. Clamps above the table to
    /// the first row and below it to the last; otherwise interpolates
    /// linearly within the bracketing interval.
    pub fn estimate(&self, voltage_mv: u16) -> u8 {
        for (i, row) in self.pairs.iter().enumerate() {
            if voltage_mv > row.voltage_mv {
                if i == 0 {
                    // Above the table's maximum voltage.
                    return self.pairs[0].capacity_pct;
                }
                let upper = self.pairs[i - 1];
                let span_pct = u32::from(upper.capacity_pct - row.capacity_pct);
                let span_mv = u32::from(upper.voltage_mv - row.voltage_mv);
                let above_mv = u32::from(voltage_mv - row.voltage_mv);
                let interpolated = above_mv * span_pct / span_mv;
                return row.capacity_pct + interpolated as u8;
            }
        }
        // Below the table's minimum voltage.
        self.pairs[self.pairs.len() - 1].capacity_pct
    }
}
