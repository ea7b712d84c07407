//! `.BCTYPE` boundary type file (always ASCII).
//!
//! Maps each boundary domain, by 1-based index, from its user-visible name to
//! the ADS `NN_TYPENAME` label.

use crate::classify::Classification;
use crate::export_error::AdsExportError;
use std::io::Write;

const LEGEND: &str = "\
******************************************************************
***ADS BC NAME***********DESCRIPTION******************************
******************************************************************
*** XX_INTERNAL     --> 'INTERIOR'                             ***
*** XX_FLOWTAN      --> 'FLOW TANGENCY'                        ***
*** XX_INFLOW       --> 'UP-STREAM'                            ***
*** XX_OUTFLOW      --> 'DOWN-STREAM'                          ***
*** XX_FARFIELD     --> 'FARFIELD IN/OUT'                      ***
*** XX_NRINFLOW     --> 'CASCADE UP-STREAM'                    ***
*** XX_NROUTFLOW    --> 'CASCADE DOWN-STREAM'                  ***
*** XX_INVISCID     --> 'NO FLOW NORMAL TO THE SURFACE'        ***
*** XX_WALLF        --> 'WALL FUNCTION'                        ***
*** XX_WALLIQ       --> 'NON-SLIP WALL WITH Q INPUT'           ***
*** XX_WALLIA       --> 'NON-SLIP WALL Q = 0.0'                ***
*** XX_WALLIS       --> 'NON-SLIP WALL IN STATIONARY FRAME'    ***
*** XX_WALLFCHT     --> 'WALL FUNCTION'                        ***
*** XX_WALLIQCHT    --> 'NON-SLIP WALL WITH Q INPUT'           ***
*** XX_WALLIACHT    --> 'NON-SLIP WALL Q = 0.0'                ***
*** XX_WALLISCHT    --> 'NON-SLIP WALL IN STATIONARY FRAME'    ***
*** XX_NMLINFLOW    --> 'INLET FLOW NORMAL TO MESH'            ***
*** XX_PERIODIC     --> 'PERIODIC FACE'                        ***
*** XX_PERIODICSHDW --> 'PERIODIC SHADOW FACE'                 ***
*** XX_INTSCT       --> 'INTERSECTOR PERIODIC FACE'            ***
*** XX_INTSCTSHDW   --> 'INTERSECTOR PERIODIC SHADOW FACE'     ***
*** XX_ISOTHERMAL   --> 'CONSTANT T WALL FOR HEAT CONDUCTION'  ***
*** XX_ADIABATIC    --> 'ADIABATIC WALL FOR HEAT CONDUCTION'   ***
*** XX_FMVINFLOW    --> 'UPSTREAM WITH FLOATING MERIDIONAL V'  ***
******************************************************************

";

const ROW_LABEL: &str = "*BC NUMBER,    CFX NAME,                           ADS NAME\n";

/// Write the `.BCTYPE` contents for a classified model.
pub fn write_bctype<W: Write>(
    writer: &mut W,
    classification: &Classification,
) -> Result<(), AdsExportError> {
    writer.write_all(LEGEND.as_bytes())?;
    writeln!(writer, "*NUMBER OF BOUNDARY CONDITIONS")?;
    writeln!(writer, "{:<12}", classification.len())?;
    for (idx, assignment) in classification.assignments().iter().enumerate() {
        writer.write_all(ROW_LABEL.as_bytes())?;
        writeln!(
            writer,
            "{:<15}{:<36}{:<12}",
            idx + 1,
            assignment.condition.name,
            assignment.ads_name
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BoundaryTypeCatalog;
    use crate::classify::classify;
    use crate::model::BoundaryCondition;

    #[test]
    fn rows_pair_names_with_ads_labels() {
        let c = classify(
            BoundaryTypeCatalog::legacy(),
            [
                Some(BoundaryCondition::new(8, 1, "hub")),
                Some(BoundaryCondition::new(8, 1, "shroud")),
            ],
        );
        let mut out = Vec::new();
        write_bctype(&mut out, &c).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        let legend_lines = LEGEND.lines().count();

        assert_eq!(lines[legend_lines], "*NUMBER OF BOUNDARY CONDITIONS");
        assert_eq!(lines[legend_lines + 1], format!("2{}", " ".repeat(11)));
        assert_eq!(lines[legend_lines + 2], ROW_LABEL.trim_end_matches('\n'));
        assert_eq!(
            lines[legend_lines + 3],
            format!("1{}hub{}00_WALLF    ", " ".repeat(14), " ".repeat(33))
        );
        assert!(lines[legend_lines + 5].starts_with("2              shroud"));
        assert!(lines[legend_lines + 5].contains("01_WALLF"));
    }
}
