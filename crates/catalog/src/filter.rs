use std::str::FromStr;

use crate::building::Building;

/// Inclusive numeric range.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NumericRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> NumericRange<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: T) -> bool {
        v >= self.min && v <= self.max
    }

    /// Smallest range covering every value; `None` for an empty iterator.
    pub fn spanning(values: impl IntoIterator<Item = T>) -> Option<Self> {
        let mut iter = values.into_iter();
        let first = iter.next()?;
        let mut out = Self::new(first, first);
        for v in iter {
            if v < out.min {
                out.min = v;
            }
            if v > out.max {
                out.max = v;
            }
        }
        Some(out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeParseError(String);

impl std::fmt::Display for RangeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid range {:?}: expected MIN..MAX", self.0)
    }
}

impl std::error::Error for RangeParseError {}

/// Parses `MIN..MAX` (both bounds inclusive).
impl<T: FromStr + PartialOrd + Copy> FromStr for NumericRange<T> {
    type Err = RangeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || RangeParseError(s.to_string());
        let (a, b) = s.split_once("..").ok_or_else(err)?;
        let min = a.trim().parse::<T>().map_err(|_| err())?;
        let max = b.trim().parse::<T>().map_err(|_| err())?;
        if min > max {
            return Err(err());
        }
        Ok(Self::new(min, max))
    }
}

/// The sidebar's three range selections.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FilterRanges {
    pub year: NumericRange<i32>,
    pub floors: NumericRange<u32>,
    pub cost: NumericRange<f64>,
}

impl FilterRanges {
    /// Ranges spanning the whole dataset, i.e. the filter that keeps everything.
    pub fn full_extent(buildings: &[Building]) -> Option<Self> {
        Some(Self {
            year: NumericRange::spanning(buildings.iter().map(|b| b.year))?,
            floors: NumericRange::spanning(buildings.iter().map(|b| b.floors))?,
            cost: NumericRange::spanning(buildings.iter().map(|b| b.cost))?,
        })
    }

    pub fn matches(&self, b: &Building) -> bool {
        self.year.contains(b.year) && self.floors.contains(b.floors) && self.cost.contains(b.cost)
    }

    /// Filters `buildings`, keeping dataset order.
    pub fn apply(&self, buildings: &[Building]) -> Vec<Building> {
        buildings.iter().filter(|b| self.matches(b)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{FilterRanges, NumericRange};
    use crate::building::sample_buildings;
    use pretty_assertions::assert_eq;

    #[test]
    fn full_extent_keeps_everything() {
        let all = sample_buildings();
        let ranges = FilterRanges::full_extent(&all).expect("non-empty");
        assert_eq!(ranges.year, NumericRange::new(1931, 2023));
        assert_eq!(ranges.floors, NumericRange::new(54, 163));
        assert_eq!(ranges.cost, NumericRange::new(40_948_900.0, 15.0e9));
        assert_eq!(ranges.apply(&all), all);
    }

    #[test]
    fn empty_dataset_has_no_extent() {
        assert!(FilterRanges::full_extent(&[]).is_none());
    }

    #[test]
    fn year_bounds_are_inclusive_and_order_is_kept() {
        let all = sample_buildings();
        let mut ranges = FilterRanges::full_extent(&all).expect("non-empty");
        ranges.year = NumericRange::new(2015, 2020);

        let names: Vec<_> = ranges.apply(&all).into_iter().map(|b| b.name).collect();
        assert_eq!(
            names,
            vec![
                "Shanghai Tower",
                "Ping An Finance Centre",
                "Lotte World Tower",
                "Guangzhou CTF Finance Centre",
                "Tianjin CTF Finance Centre",
                "China Zun",
                "Lakhta Center",
                "Landmark 81",
                "Changsha IFS Tower T1",
                "Suyong Bay Tower",
            ]
        );
    }

    #[test]
    fn combined_ranges_intersect() {
        let all = sample_buildings();
        let ranges = FilterRanges {
            year: NumericRange::new(2000, 2012),
            floors: NumericRange::new(100, 200),
            cost: NumericRange::new(0.0, 2.0e9),
        };
        let names: Vec<_> = ranges.apply(&all).into_iter().map(|b| b.name).collect();
        assert_eq!(
            names,
            vec![
                "Burj Khalifa",
                "Taipei 101",
                "Shanghai World Financial Center",
                "International Commerce Centre",
            ]
        );
    }

    #[test]
    fn parses_range_syntax() {
        let r: NumericRange<i32> = "2015..2020".parse().expect("parse");
        assert_eq!(r, NumericRange::new(2015, 2020));
        let c: NumericRange<f64> = "0..1.5e9".parse().expect("parse");
        assert_eq!(c.max, 1.5e9);
        assert!("2020..2015".parse::<NumericRange<i32>>().is_err());
        assert!("2015".parse::<NumericRange<i32>>().is_err());
    }
}
