// Copyright 2025 Stoolap Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The `systypes` system catalog table

use crate::core::{Column, DataType, DataValue, Result, Table};

/// Name the system catalog table is queried by
pub const SYSTYPES: &str = "systypes";

// name, xtype, xusertype, length, xprec, xscale, allownulls
const ROWS: [(&str, i32, i32, i32, i32, i32, i32); 34] = [
    ("image", 34, 34, 16, 0, 0, 1),
    ("text", 35, 35, 16, 0, 0, 1),
    ("uniqueidentifier", 36, 36, 16, 0, 0, 1),
    ("date", 40, 40, 3, 10, 0, 1),
    ("time", 41, 41, 5, 16, 7, 1),
    ("datetime2", 42, 42, 8, 27, 7, 1),
    ("datetimeoffset", 43, 43, 10, 34, 7, 1),
    ("tinyint", 48, 48, 1, 3, 0, 1),
    ("smallint", 52, 52, 2, 5, 0, 1),
    ("int", 56, 56, 4, 10, 0, 1),
    ("smalldatetime", 58, 58, 4, 16, 0, 1),
    ("real", 59, 59, 4, 24, 0, 1),
    ("money", 60, 60, 8, 19, 4, 1),
    ("datetime", 61, 61, 8, 23, 3, 1),
    ("float", 62, 62, 8, 53, 0, 1),
    ("sql_variant", 98, 98, 8016, 0, 0, 1),
    ("ntext", 99, 99, 16, 0, 0, 1),
    ("bit", 104, 104, 1, 1, 0, 1),
    ("decimal", 106, 106, 17, 38, 38, 1),
    ("numeric", 108, 108, 17, 38, 38, 1),
    ("smallmoney", 122, 122, 4, 10, 4, 1),
    ("bigint", 127, 127, 8, 19, 0, 1),
    ("hierarchyid", 240, 128, 892, 0, 0, 1),
    ("geometry", 240, 129, -1, 0, 0, 1),
    ("geography", 240, 130, -1, 0, 0, 1),
    ("varbinary", 165, 165, 8000, 0, 0, 1),
    ("varchar", 167, 167, 8000, 0, 0, 1),
    ("binary", 173, 173, 8000, 0, 0, 1),
    ("char", 175, 175, 8000, 0, 0, 1),
    ("timestamp", 189, 80, 8, 0, 0, 0),
    ("nvarchar", 231, 231, 8000, 0, 0, 1),
    ("nchar", 239, 239, 8000, 0, 0, 1),
    ("xml", 241, 241, -1, 0, 0, 1),
    ("sysname", 231, 256, 256, 0, 0, 0),
];

/// Build a fresh copy of the `systypes` table
pub fn build() -> Result<Table> {
    let columns = vec![
        Column::new("name", DataType::NVarChar, false),
        Column::new("xtype", DataType::Int, false),
        Column::new("xusertype", DataType::Int, false),
        Column::new("length", DataType::Int, false),
        Column::new("xprec", DataType::Int, false),
        Column::new("xscale", DataType::Int, false),
        Column::new("allownulls", DataType::Int, true),
    ];
    let rows = ROWS
        .iter()
        .map(|&(name, xtype, xusertype, length, xprec, xscale, allownulls)| {
            vec![
                DataValue::nvarchar(name),
                DataValue::int(xtype),
                DataValue::int(xusertype),
                DataValue::int(length),
                DataValue::int(xprec),
                DataValue::int(xscale),
                DataValue::int(allownulls),
            ]
        })
        .collect();
    Table::with_rows(SYSTYPES, columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_systypes_shape() {
        let table = build().unwrap();
        assert_eq!(table.rows().len(), 34);
        assert_eq!(table.columns().len(), 7);
        assert_eq!(table.column_ordinal("XTYPE"), Some(1));
    }

    #[test]
    fn test_systypes_int_row() {
        let table = build().unwrap();
        let row = table
            .rows()
            .iter()
            .find(|r| r[0].as_str() == Some("int"))
            .unwrap();
        assert_eq!(row[1], DataValue::int(56));
        assert_eq!(row[3], DataValue::int(4));
    }
}
