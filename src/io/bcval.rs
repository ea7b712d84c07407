//! `.BCVAL` boundary value file (always ASCII).
//!
//! One block per boundary domain with an all-zero data line; ADS users fill
//! in the values before running the solver.

use crate::classify::Classification;
use crate::export_error::AdsExportError;
use std::io::Write;

const HEADER: &str = "\
******************************************************************
*BOUNDARY TYPE    DEFINITION                                     *
*00                No value applied                              *
*01                Reserved                                      *
*02                Inflow                                        *
*03                Outflow                                       *
*04                Reserved                                      *
*05                Reserved                                      *
******************************************************************
";

const BLOCK_LABEL: &str = "*BOUNDARY_TYPE BOUNDARY_NAME                        IFANG\n";
const VALUE_LABEL: &str = "*           MLO           PTLO           TTLO          ALPHA           BETA\n";
const VALUE_ZEROS: &str = "      0.0000000      0.0000000      0.0000000      0.0000000      0.0000000\n";

/// Boundary type and angle flag written for every domain.
const UNSET_BOUNDARY_TYPE: i32 = 0;
const UNSET_IFANG: i32 = 0;

/// Write the `.BCVAL` contents for a classified model.
pub fn write_bcval<W: Write>(
    writer: &mut W,
    classification: &Classification,
) -> Result<(), AdsExportError> {
    writer.write_all(HEADER.as_bytes())?;
    writeln!(writer, "*NUMBER OF BOUNDARY CONDITIONS")?;
    writeln!(writer, "{:>12}", classification.len())?;
    for assignment in classification.assignments() {
        writer.write_all(BLOCK_LABEL.as_bytes())?;
        writeln!(
            writer,
            " {:<14}{:<37}{:<12}",
            UNSET_BOUNDARY_TYPE, assignment.condition.name, UNSET_IFANG
        )?;
        writer.write_all(VALUE_LABEL.as_bytes())?;
        writer.write_all(VALUE_ZEROS.as_bytes())?;
    }
    Ok(())
}
