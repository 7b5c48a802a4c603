//! Forward-fill of missing rents along each zipcode's time series.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::LongPanel;

/// Replace each `None` with the last preceding `Some`. Leading `None`s stay.
///
/// Returns the number of filled cells.
pub fn forward_fill(series: &mut [Option<f64>]) -> usize {
    let mut last = None;
    let mut filled = 0;
    for value in series.iter_mut() {
        match value {
            Some(v) => last = Some(*v),
            None => {
                if let Some(prev) = last {
                    *value = Some(prev);
                    filled += 1;
                }
            }
        }
    }
    filled
}

/// Forward-fill `Rent` per zipcode in chronological order.
///
/// Rows are indexed by (zipcode, date) so the fill follows dates regardless
/// of the panel's row order. Returns the number of filled cells.
pub fn fill_by_zipcode(panel: &mut LongPanel) -> usize {
    let Some(zip_idx) = panel.id_index(crate::models::ZIPCODE_COLUMN) else {
        return 0;
    };

    let mut index: BTreeMap<&str, BTreeMap<NaiveDate, usize>> = BTreeMap::new();
    for (i, row) in panel.rows.iter().enumerate() {
        index
            .entry(row.ids[zip_idx].as_str())
            .or_default()
            .insert(row.date, i);
    }

    let updates: Vec<(Vec<usize>, Vec<Option<f64>>)> = index
        .into_values()
        .map(|by_date| {
            let positions: Vec<usize> = by_date.into_values().collect();
            let mut series: Vec<Option<f64>> =
                positions.iter().map(|&i| panel.rows[i].rent).collect();
            forward_fill(&mut series);
            (positions, series)
        })
        .collect();

    let mut filled = 0;
    for (positions, series) in updates {
        for (i, rent) in positions.into_iter().zip(series) {
            let row = &mut panel.rows[i];
            if row.rent.is_none() && rent.is_some() {
                filled += 1;
            }
            row.rent = rent;
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PanelRow;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn test_forward_fill_series() {
        let mut series = vec![None, None, Some(10.0), None, Some(20.0)];
        let filled = forward_fill(&mut series);

        assert_eq!(series, vec![None, None, Some(10.0), Some(10.0), Some(20.0)]);
        assert_eq!(filled, 1);
    }

    #[test]
    fn test_forward_fill_trailing_gap() {
        let mut series = vec![Some(5.0), None, None];
        assert_eq!(forward_fill(&mut series), 2);
        assert_eq!(series, vec![Some(5.0), Some(5.0), Some(5.0)]);
    }

    #[test]
    fn test_forward_fill_never_backfills() {
        let mut series = vec![None, Some(7.0)];
        assert_eq!(forward_fill(&mut series), 0);
        assert_eq!(series[0], None);
    }

    #[test]
    fn test_fill_follows_dates_not_row_order() {
        let zip = |z: &str| vec![z.to_string()];
        let mut panel = LongPanel {
            id_columns: vec!["Zipcode".into()],
            rows: vec![
                // out of chronological order on purpose
                PanelRow::new(zip("00501"), date(2015, 3), None),
                PanelRow::new(zip("00501"), date(2015, 1), Some(100.0)),
                PanelRow::new(zip("10001"), date(2015, 2), None),
                PanelRow::new(zip("00501"), date(2015, 2), None),
                PanelRow::new(zip("10001"), date(2015, 1), None),
                PanelRow::new(zip("10001"), date(2015, 3), Some(300.0)),
            ],
            has_state_county: false,
        };

        let filled = fill_by_zipcode(&mut panel);

        assert_eq!(filled, 2);
        assert_eq!(panel.rows[0].rent, Some(100.0));
        assert_eq!(panel.rows[3].rent, Some(100.0));
        // zipcodes do not leak into each other
        assert_eq!(panel.rows[2].rent, None);
        assert_eq!(panel.rows[4].rent, None);
    }
}
