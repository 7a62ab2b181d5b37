//! Integration tests for the processor module
//!
//! Tests the complete import pipeline using synthetic FMPXMLRESULT exports.


/// A field declaration for fixture exports: (name, TYPE, EMPTYOK)
pub type FieldSpec<'a> = (&'a str, &'a str, &'a str);

/// Build a complete FMPXMLRESULT document. Each row is a list of cell values,
/// one per declared field.
pub fn build_export(fields: &[FieldSpec<'_>], rows: &[Vec<&str>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" ?>
<FMPXMLRESULT xmlns="http://www.filemaker.com/fmpxmlresult">
  <ERRORCODE>0</ERRORCODE>
  <PRODUCT BUILD="06-20-2019" NAME="FileMaker" VERSION="ProAdvanced 18.0.2"/>
  <DATABASE DATEFORMAT="yyyy/M/d" LAYOUT="" NAME="Inventory.fmp12" RECORDS="3" TIMEFORMAT="h:mm:ss a"/>
  <METADATA>
"#,
    );

    for (name, kind, empty_ok) in fields {
        xml.push_str(&format!(
            "    <FIELD EMPTYOK=\"{}\" MAXREPEAT=\"1\" NAME=\"{}\" TYPE=\"{}\"/>\n",
            empty_ok, name, kind
        ));
    }
    xml.push_str("  </METADATA>\n");
    xml.push_str(&format!("  <RESULTSET FOUND=\"{}\">\n", rows.len()));

    for (index, row) in rows.iter().enumerate() {
        xml.push_str(&format!(
            "    <ROW MODID=\"1\" RECORDID=\"{}\">\n",
            index + 1
        ));
        for value in row {
            xml.push_str(&format!("      <COL><DATA>{}</DATA></COL>\n", value));
        }
        xml.push_str("    </ROW>\n");
    }

    xml.push_str("  </RESULTSET>\n</FMPXMLRESULT>\n");
    xml
}

/// The standard inventory fixture used across the processor tests
pub fn inventory_fields() -> Vec<FieldSpec<'static>> {
    vec![
        ("Item", "TEXT", "NO"),
        ("Qty", "NUMBER", "YES"),
        ("Received", "DATE", "YES"),
        ("Opened", "TIME", "YES"),
    ]
}
