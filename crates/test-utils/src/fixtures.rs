//! Common CSV fixtures shaped like the ZHVI ZIP-level export.
//!
//! The real file carries a block of metadata columns followed by one column
//! per month. These fixtures keep the same header layout with a handful of
//! rows that exercise each ingestion rule.

/// A small, well-formed export with monthly (`YYYY-MM-DD`) columns.
///
/// Rows:
/// - `90210`: two full months
/// - `501` (stored as `00501`): one value, one empty cell
/// - `0`: the placeholder region, must be dropped
/// - `10001`: every date cell empty, must be dropped
pub const MONTHLY_CSV: &str = "\
RegionID,SizeRank,RegionName,RegionType,StateName,State,City,Metro,CountyName,2020-01-31,2020-02-29
96107,1,90210,zip,CA,CA,Beverly Hills,Los Angeles-Long Beach-Anaheim,Los Angeles County,500000,510000
58196,2,501,zip,NY,NY,Holtsville,New York-Newark-Jersey City,Suffolk County,,250000.5
00001,3,0,zip,,,,,,100,200
61615,4,10001,zip,NY,NY,New York,New York-Newark-Jersey City,New York County,,
";

/// The `RegionName,YYYY-MM` shape with surrounding whitespace, an empty line
/// and a whitespace-only line.
pub const PADDED_CSV: &str =
    "RegionName , 2020-01 , 2020-02\n\n 90210 , 500000 , 510000\n    \n123,  , 42\n";

/// Same region twice; the later row must win.
pub const DUPLICATE_CSV: &str = "\
RegionName,2020-01
02108,1
02108,2
";

/// A date cell holding a non-numeric literal.
pub const TEXT_CELL_CSV: &str = "\
RegionName,2020-01,2020-02
30301,n/a,300000
";

/// No `RegionName` column at all.
pub const MISSING_REGION_CSV: &str = "\
RegionID,2020-01
1,100
";

/// A row with too many fields between two valid rows.
pub const MALFORMED_CSV: &str = "\
RegionName,2020-01
11111,100
22222,200,300
33333,300
";

/// Build an export with `rows` synthetic regions and `months` date columns.
pub fn synthetic_csv(rows: usize, months: usize) -> String {
    let mut csv = String::from("RegionName");
    for m in 0..months {
        csv.push_str(&format!(",{:04}-{:02}", 2000 + m / 12, m % 12 + 1));
    }
    csv.push('\n');
    for r in 1..=rows {
        csv.push_str(&r.to_string());
        for m in 0..months {
            csv.push_str(&format!(",{}", 100_000 + r * 10 + m));
        }
        csv.push('\n');
    }
    csv
}
