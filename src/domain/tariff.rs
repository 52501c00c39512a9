// Time-of-use tariff discharge domain: controller states, price units, classification
use serde::Serialize;

/// One value per quarter hour over a day.
pub const QUARTERS_PER_DAY: usize = 96;

/// State reported by the time-of-use tariff discharge controller per quarter hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TariffState {
    NotStarted,
    Delayed,
    AllowsDischarge,
    Standby,
}

impl TariffState {
    /// Maps a raw channel value to a state. Non-integral or unknown codes yield `None`.
    pub fn from_code(code: f64) -> Option<Self> {
        if code.fract() != 0.0 {
            return None;
        }
        match code as i64 {
            -1 => Some(Self::NotStarted),
            0 => Some(Self::Delayed),
            1 => Some(Self::AllowsDischarge),
            2 => Some(Self::Standby),
            _ => None,
        }
    }
}

/// Converts a price in currency/MWh to cent/kWh, rounded to 4 decimals.
///
/// Missing and NaN prices have no value; zero is passed through unscaled.
pub fn convert_price(price: Option<f64>) -> Option<f64> {
    let price = price.filter(|p| !p.is_nan())?;
    if price == 0.0 {
        return Some(0.0);
    }
    let scaled = price / 10.0;
    // half-up rounding, matching what the charting front-end expects
    Some((scaled * 10000.0 + 0.5).floor() / 10000.0)
}

/// State of charge in percent; anything outside [0, 100] is not plotted.
pub fn clamp_soc(value: Option<f64>) -> Option<f64> {
    value.filter(|v| (0.0..=100.0).contains(v))
}

/// Quarter-hour prices split by controller state, all aligned to the same indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedPrices {
    pub delayed: Vec<Option<f64>>,
    pub discharge: Vec<Option<f64>>,
    pub standby: Vec<Option<f64>>,
    /// Indices whose state code was not recognized, with the raw code.
    pub unrecognized: Vec<(usize, f64)>,
}

impl ClassifiedPrices {
    fn push(&mut self, delayed: Option<f64>, discharge: Option<f64>, standby: Option<f64>) {
        self.delayed.push(delayed);
        self.discharge.push(discharge);
        self.standby.push(standby);
    }
}

/// Classifies one day of quarter-hour prices by the controller state of the same slot.
///
/// Exactly one series carries the converted price where the state is known; all
/// three are empty where the state is absent or unrecognized. Slots beyond the end
/// of either input are treated as absent.
pub fn classify_quarterly_prices(prices: &[Option<f64>], states: &[Option<f64>]) -> ClassifiedPrices {
    let mut result = ClassifiedPrices {
        delayed: Vec::with_capacity(QUARTERS_PER_DAY),
        discharge: Vec::with_capacity(QUARTERS_PER_DAY),
        standby: Vec::with_capacity(QUARTERS_PER_DAY),
        unrecognized: Vec::new(),
    };

    for i in 0..QUARTERS_PER_DAY {
        let price = convert_price(prices.get(i).copied().flatten());
        let Some(code) = states.get(i).copied().flatten() else {
            result.push(None, None, None);
            continue;
        };

        match TariffState::from_code(code) {
            Some(TariffState::Delayed) => result.push(price, None, None),
            Some(TariffState::AllowsDischarge) => result.push(None, price, None),
            Some(TariffState::NotStarted | TariffState::Standby) => result.push(None, None, price),
            None => {
                result.unrecognized.push((i, code));
                result.push(None, None, None);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_price() {
        assert_eq!(convert_price(None), None);
        assert_eq!(convert_price(Some(f64::NAN)), None);
        assert_eq!(convert_price(Some(0.0)), Some(0.0));
        assert_eq!(convert_price(Some(10.0)), Some(1.0));
        assert_eq!(convert_price(Some(100.0)), Some(10.0));
        assert_eq!(convert_price(Some(12.3456)), Some(1.2346));
        assert_eq!(convert_price(Some(-25.0)), Some(-2.5));
    }

    #[test]
    fn test_convert_price_keeps_four_decimals() {
        for raw in [0.123_456_7, 33.333_33, 251.987_65, -7.777_77] {
            let converted = convert_price(Some(raw)).unwrap();
            let shifted = converted * 10000.0;
            assert!((shifted - shifted.round()).abs() < 1e-6, "{converted}");
        }
    }

    #[test]
    fn test_clamp_soc() {
        assert_eq!(clamp_soc(Some(50.0)), Some(50.0));
        assert_eq!(clamp_soc(Some(0.0)), Some(0.0));
        assert_eq!(clamp_soc(Some(100.0)), Some(100.0));
        assert_eq!(clamp_soc(Some(101.0)), None);
        assert_eq!(clamp_soc(Some(-1.0)), None);
        assert_eq!(clamp_soc(None), None);
    }

    #[test]
    fn test_state_codes() {
        assert_eq!(TariffState::from_code(-1.0), Some(TariffState::NotStarted));
        assert_eq!(TariffState::from_code(0.0), Some(TariffState::Delayed));
        assert_eq!(TariffState::from_code(1.0), Some(TariffState::AllowsDischarge));
        assert_eq!(TariffState::from_code(2.0), Some(TariffState::Standby));
        assert_eq!(TariffState::from_code(3.0), None);
        assert_eq!(TariffState::from_code(0.5), None);
    }

    #[test]
    fn test_delayed_slot_gets_price() {
        let mut prices = vec![None; QUARTERS_PER_DAY];
        let mut states = vec![None; QUARTERS_PER_DAY];
        prices[7] = Some(100.0);
        states[7] = Some(0.0);

        let classified = classify_quarterly_prices(&prices, &states);

        assert_eq!(classified.delayed[7], Some(10.0));
        assert_eq!(classified.discharge[7], None);
        assert_eq!(classified.standby[7], None);
    }

    #[test]
    fn test_alternating_states_with_constant_price() {
        let cycle = [Some(0.0), Some(1.0), Some(2.0), Some(-1.0), None];
        let states: Vec<Option<f64>> = (0..QUARTERS_PER_DAY).map(|i| cycle[i % cycle.len()]).collect();
        let prices = vec![Some(50.0); QUARTERS_PER_DAY];

        let classified = classify_quarterly_prices(&prices, &states);

        assert_eq!(classified.delayed.len(), QUARTERS_PER_DAY);
        assert_eq!(classified.discharge.len(), QUARTERS_PER_DAY);
        assert_eq!(classified.standby.len(), QUARTERS_PER_DAY);
        assert!(classified.unrecognized.is_empty());

        for (i, state) in states.iter().enumerate() {
            let row = (classified.delayed[i], classified.discharge[i], classified.standby[i]);
            match state {
                Some(s) if *s == 0.0 => assert_eq!(row, (Some(5.0), None, None)),
                Some(s) if *s == 1.0 => assert_eq!(row, (None, Some(5.0), None)),
                Some(_) => assert_eq!(row, (None, None, Some(5.0))),
                None => assert_eq!(row, (None, None, None)),
            }
        }
    }

    #[test]
    fn test_unrecognized_state_is_dropped_and_reported() {
        let prices = vec![Some(50.0); 3];
        let states = vec![Some(1.0), Some(7.0), Some(2.0)];

        let classified = classify_quarterly_prices(&prices, &states);

        assert_eq!(classified.unrecognized, vec![(1, 7.0)]);
        assert_eq!(
            (classified.delayed[1], classified.discharge[1], classified.standby[1]),
            (None, None, None)
        );
        assert_eq!(classified.discharge[0], Some(5.0));
        assert_eq!(classified.standby[2], Some(5.0));
        // short inputs are padded as absent
        assert_eq!(classified.standby.len(), QUARTERS_PER_DAY);
        assert_eq!(classified.standby[50], None);
    }
}
