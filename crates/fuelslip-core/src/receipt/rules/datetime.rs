//! Purchase date and time extraction.
//!
//! Output is always day-first with slashes: `DD/MM/YYYY`, optionally
//! followed by `HH:MM[:SS]`. When only one half is found, that half is
//! returned alone.

use super::patterns::{DATE_DMY, DATE_LINE, DATE_TIME_DMY, DATE_TIME_YMD, TIME, TIME_LINE};
use super::{ExtractionMatch, ReceiptContext};

/// Extract the purchase date/time.
///
/// The vendor prints the time and the date on their own lines; those are
/// tried first. Otherwise the whole receipt is searched for, in order, a
/// day-first date with time, a year-first date with time, and finally a
/// date and a time found independently.
pub fn extract_date_time(ctx: &ReceiptContext<'_>) -> Option<ExtractionMatch<String>> {
    fixed_lines(ctx)
        .or_else(|| day_first_with_time(&ctx.corpus))
        .or_else(|| year_first_with_time(&ctx.corpus))
        .or_else(|| separate_date_and_time(&ctx.corpus))
}

fn fixed_lines(ctx: &ReceiptContext<'_>) -> Option<ExtractionMatch<String>> {
    let layout = ctx.config.layout;
    let time = ctx.normalized_line(layout.time_line).and_then(|line| time_from_line(&line));
    let date = ctx
        .normalized_line(layout.date_line)
        .and_then(|line| date_from_line(&line, ctx));

    let value = match (date, time) {
        (Some(date), Some(time)) => format!("{date} {time}"),
        (Some(date), None) => date,
        (None, Some(time)) => time,
        (None, None) => return None,
    };
    Some(ExtractionMatch::new(value.clone(), "fixed_lines", value))
}

fn time_from_line(line: &str) -> Option<String> {
    TIME_LINE.captures(line).map(|caps| caps[1].to_string())
}

fn date_from_line(line: &str, ctx: &ReceiptContext<'_>) -> Option<String> {
    let caps = DATE_LINE.captures(line)?;
    let year = &caps[3];
    let year = if year.len() == 2 {
        ctx.config.century.expand(year, ctx.reference_year)?
    } else {
        year.to_string()
    };
    Some(format!("{}/{}/{}", &caps[1], &caps[2], year))
}

fn day_first_with_time(text: &str) -> Option<ExtractionMatch<String>> {
    let caps = DATE_TIME_DMY.captures(text)?;
    let value = format!("{} {}", caps[1].replace('-', "/"), &caps[2]);
    Some(ExtractionMatch::new(value, "day_first_with_time", &caps[0]))
}

fn year_first_with_time(text: &str) -> Option<ExtractionMatch<String>> {
    let caps = DATE_TIME_YMD.captures(text)?;
    let value = format!("{}/{}/{} {}", &caps[3], &caps[2], &caps[1], &caps[4]);
    Some(ExtractionMatch::new(value, "year_first_with_time", &caps[0]))
}

fn separate_date_and_time(text: &str) -> Option<ExtractionMatch<String>> {
    let date = DATE_DMY.find(text).map(|m| m.as_str().replace('-', "/"));
    let time = TIME.find(text).map(|m| m.as_str().to_string());

    let value = match (date, time) {
        (Some(date), Some(time)) => format!("{date} {time}"),
        (Some(date), None) => date,
        (None, Some(time)) => time,
        (None, None) => return None,
    };
    Some(ExtractionMatch::new(value.clone(), "separate_date_time", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::{CenturyRule, ExtractionConfig};
    use crate::ocr::FragmentSequence;
    use crate::receipt::rules::test_support::{receipt, receipt_with_lines};
    use pretty_assertions::assert_eq;

    fn date_time(fragments: &FragmentSequence, year: i32) -> Option<ExtractionMatch<String>> {
        let config = ExtractionConfig::default();
        let ctx = ReceiptContext::new(fragments, "shell", year, &config);
        extract_date_time(&ctx)
    }

    #[test]
    fn test_fixed_lines_combined() {
        let fragments = receipt_with_lines(20, &[(15, "14:32"), (16, "01-06-24")]);
        let found = date_time(&fragments, 2024).unwrap();
        assert_eq!(found.value, "01/06/2024 14:32");
        assert_eq!(found.strategy, "fixed_lines");
    }

    #[test]
    fn test_fixed_lines_are_normalized() {
        let fragments = receipt_with_lines(20, &[(15, "14:3O:O5"), (16, "O1/O6/2O24")]);
        assert_eq!(date_time(&fragments, 2024).unwrap().value, "01/06/2024 14:30:05");
    }

    #[test]
    fn test_century_from_reference_year() {
        let fragments = receipt_with_lines(17, &[(16, "31/12/99")]);
        assert_eq!(date_time(&fragments, 2024).unwrap().value, "31/12/1999");

        let fragments = receipt_with_lines(17, &[(16, "31/12/30")]);
        assert_eq!(date_time(&fragments, 2024).unwrap().value, "31/12/2030");
    }

    #[test]
    fn test_configured_century_rule() {
        let fragments = receipt_with_lines(17, &[(16, "01/01/40")]);
        let config = ExtractionConfig {
            century: CenturyRule {
                future_margin: 0,
                past_gap: 10,
            },
            ..ExtractionConfig::default()
        };
        let ctx = ReceiptContext::new(&fragments, "shell", 2024, &config);
        assert_eq!(extract_date_time(&ctx).unwrap().value, "01/01/1940");
    }

    #[test]
    fn test_unbounded_future_margin() {
        let fragments = receipt_with_lines(17, &[(16, "01/01/99")]);
        let config = ExtractionConfig {
            century: CenturyRule {
                future_margin: i32::MAX,
                past_gap: 50,
            },
            ..ExtractionConfig::default()
        };
        let ctx = ReceiptContext::new(&fragments, "shell", 2024, &config);
        assert_eq!(extract_date_time(&ctx).unwrap().value, "01/01/2099");
    }

    #[test]
    fn test_only_time_line() {
        let fragments = receipt_with_lines(17, &[(15, "09:05")]);
        assert_eq!(date_time(&fragments, 2024).unwrap().value, "09:05");
    }

    #[test]
    fn test_only_date_line() {
        let fragments = receipt_with_lines(17, &[(15, "JAM 09:05"), (16, "01-06-2024")]);
        let found = date_time(&fragments, 2024).unwrap();
        // Line 15 holds more than a time, so only the date line applies.
        assert_eq!(found.value, "01/06/2024");
    }

    #[test]
    fn test_corpus_day_first_with_time() {
        let fragments = receipt(&["SHELL", "Tgl 05-03-2024 07:45:10", "Total"], 0.9);
        let found = date_time(&fragments, 2024).unwrap();
        assert_eq!(found.value, "05/03/2024 07:45:10");
        assert_eq!(found.strategy, "day_first_with_time");
    }

    #[test]
    fn test_corpus_year_first_with_time() {
        let fragments = receipt(&["SHELL", "2024-03-05 07:45", "Total"], 0.9);
        let found = date_time(&fragments, 2024).unwrap();
        assert_eq!(found.value, "05/03/2024 07:45");
        assert_eq!(found.strategy, "year_first_with_time");
    }

    #[test]
    fn test_corpus_date_and_time_apart() {
        let fragments = receipt(&["SHELL", "Jam 07:45", "Tanggal", "05/03/2024"], 0.9);
        assert_eq!(date_time(&fragments, 2024).unwrap().value, "05/03/2024 07:45");

        let fragments = receipt(&["SHELL", "05-03-2024"], 0.9);
        assert_eq!(date_time(&fragments, 2024).unwrap().value, "05/03/2024");

        let fragments = receipt(&["SHELL", "07:45"], 0.9);
        assert_eq!(date_time(&fragments, 2024).unwrap().value, "07:45");
    }

    #[test]
    fn test_no_date_time() {
        let fragments = receipt(&["SHELL", "V-Power"], 0.9);
        assert!(date_time(&fragments, 2024).is_none());
        assert!(date_time(&FragmentSequence::default(), 2024).is_none());
    }
}
