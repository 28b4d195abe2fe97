//! Dataset catalog: table name → homogeneous rows
//!
//! Registered with the engine before any query runs and consulted by the
//! validator for column names. Never mutated after construction.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

/// One record; key order is column order
pub type Row = Map<String, Value>;

/// Named in-memory tables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetCatalog {
    tables: BTreeMap<String, Vec<Row>>,
}

impl DatasetCatalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `rows` under `name`, replacing any previous table
    pub fn with_table(mut self, name: &str, rows: Vec<Row>) -> Self {
        self.tables.insert(name.to_string(), rows);
        self
    }

    /// Rows of a table, by exact (case-sensitive) name
    pub fn rows(&self, name: &str) -> Option<&[Row]> {
        self.tables.get(name).map(Vec::as_slice)
    }

    /// True if a table is registered under exactly `name`
    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Column names of the table's first row, `None` if the table is
    /// unknown or empty
    pub fn sample_columns(&self, name: &str) -> Option<Vec<&str>> {
        self.tables
            .get(name)
            .and_then(|rows| rows.first())
            .map(|row| row.keys().map(String::as_str).collect())
    }

    /// Registered tables, sorted by name
    pub fn tables(&self) -> impl Iterator<Item = (&str, &[Row])> {
        self.tables.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Registered table names, sorted
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    /// The bundled sales dataset matching [`SchemaCatalog::northwind`](super::SchemaCatalog::northwind)
    pub fn northwind() -> Self {
        Self::new()
            .with_table(
                "Customers",
                rows(json!([
                    {"CustomerID": "ALFKI", "CompanyName": "Alfreds Futterkiste", "ContactName": "Maria Anders", "Country": "Germany", "Phone": "030-0074321"},
                    {"CustomerID": "ANATR", "CompanyName": "Ana Trujillo Emparedados", "ContactName": "Ana Trujillo", "Country": "Mexico", "Phone": "(5) 555-4729"},
                    {"CustomerID": "AROUT", "CompanyName": "Around the Horn", "ContactName": "Thomas Hardy", "Country": "UK", "Phone": "(171) 555-7788"},
                    {"CustomerID": "BERGS", "CompanyName": "Berglunds snabbköp", "ContactName": "Christina Berglund", "Country": "Sweden", "Phone": "0921-12 34 65"},
                    {"CustomerID": "BLAUS", "CompanyName": "Blauer See Delikatessen", "ContactName": "Hanna Moos", "Country": "Germany", "Phone": "0621-08460"},
                    {"CustomerID": "BONAP", "CompanyName": "Bon app'", "ContactName": "Laurence Lebihan", "Country": "France", "Phone": "91.24.45.40"},
                    {"CustomerID": "CHOPS", "CompanyName": "Chop-suey Chinese", "ContactName": "Yang Wang", "Country": "Switzerland", "Phone": "0452-076545"},
                    {"CustomerID": "FRANK", "CompanyName": "Frankenversand", "ContactName": "Peter Franken", "Country": "Germany", "Phone": "089-0877310"}
                ])),
            )
            .with_table(
                "Employees",
                rows(json!([
                    {"EmployeeID": 1, "FirstName": "Nancy", "LastName": "Davolio"},
                    {"EmployeeID": 2, "FirstName": "Andrew", "LastName": "Fuller"},
                    {"EmployeeID": 3, "FirstName": "Janet", "LastName": "Leverling"},
                    {"EmployeeID": 4, "FirstName": "Margaret", "LastName": "Peacock"},
                    {"EmployeeID": 5, "FirstName": "Steven", "LastName": "Buchanan"}
                ])),
            )
            .with_table(
                "Products",
                rows(json!([
                    {"ProductID": 1, "ProductName": "Chai", "UnitsInStock": 39, "ReorderLevel": 10, "Discontinued": false},
                    {"ProductID": 2, "ProductName": "Chang", "UnitsInStock": 17, "ReorderLevel": 25, "Discontinued": false},
                    {"ProductID": 3, "ProductName": "Aniseed Syrup", "UnitsInStock": 13, "ReorderLevel": 25, "Discontinued": false},
                    {"ProductID": 4, "ProductName": "Chef Anton's Cajun Seasoning", "UnitsInStock": 53, "ReorderLevel": 0, "Discontinued": false},
                    {"ProductID": 5, "ProductName": "Chef Anton's Gumbo Mix", "UnitsInStock": 0, "ReorderLevel": 0, "Discontinued": true},
                    {"ProductID": 6, "ProductName": "Grandma's Boysenberry Spread", "UnitsInStock": 120, "ReorderLevel": 25, "Discontinued": false},
                    {"ProductID": 7, "ProductName": "Uncle Bob's Organic Dried Pears", "UnitsInStock": 15, "ReorderLevel": 10, "Discontinued": false},
                    {"ProductID": 8, "ProductName": "Northwoods Cranberry Sauce", "UnitsInStock": 6, "ReorderLevel": 10, "Discontinued": false}
                ])),
            )
            .with_table(
                "Orders",
                rows(json!([
                    {"OrderID": "10248", "CustomerID": "FRANK", "OrderDate": "2024-07-04", "ShipCity": "München", "EmployeeID": 5},
                    {"OrderID": "10249", "CustomerID": "BLAUS", "OrderDate": "2024-07-05", "ShipCity": "Mannheim", "EmployeeID": 4},
                    {"OrderID": "10250", "CustomerID": "AROUT", "OrderDate": "2024-07-08", "ShipCity": "London", "EmployeeID": 4},
                    {"OrderID": "10251", "CustomerID": "BONAP", "OrderDate": "2024-07-08", "ShipCity": "Marseille", "EmployeeID": 3},
                    {"OrderID": "10252", "CustomerID": "ALFKI", "OrderDate": "2024-07-09", "ShipCity": "Berlin", "EmployeeID": 4},
                    {"OrderID": "10253", "CustomerID": "BERGS", "OrderDate": "2024-07-10", "ShipCity": "Luleå", "EmployeeID": 3},
                    {"OrderID": "10254", "CustomerID": "CHOPS", "OrderDate": "2024-07-11", "ShipCity": "Bern", "EmployeeID": 5},
                    {"OrderID": "10255", "CustomerID": "ALFKI", "OrderDate": "2024-07-12", "ShipCity": "Berlin", "EmployeeID": 1},
                    {"OrderID": "10256", "CustomerID": "ANATR", "OrderDate": "2024-07-15", "ShipCity": "México D.F.", "EmployeeID": 2}
                ])),
            )
            .with_table(
                "OrderDetails",
                rows(json!([
                    {"OrderID": "10248", "ProductID": 1, "Quantity": 12, "UnitPrice": 14.0},
                    {"OrderID": "10248", "ProductID": 2, "Quantity": 10, "UnitPrice": 9.8},
                    {"OrderID": "10249", "ProductID": 6, "Quantity": 9, "UnitPrice": 18.6},
                    {"OrderID": "10249", "ProductID": 3, "Quantity": 40, "UnitPrice": 42.4},
                    {"OrderID": "10250", "ProductID": 4, "Quantity": 10, "UnitPrice": 7.7},
                    {"OrderID": "10250", "ProductID": 7, "Quantity": 35, "UnitPrice": 42.4},
                    {"OrderID": "10251", "ProductID": 8, "Quantity": 15, "UnitPrice": 16.8},
                    {"OrderID": "10252", "ProductID": 1, "Quantity": 6, "UnitPrice": 14.0},
                    {"OrderID": "10253", "ProductID": 2, "Quantity": 20, "UnitPrice": 9.8},
                    {"OrderID": "10253", "ProductID": 6, "Quantity": 42, "UnitPrice": 18.6},
                    {"OrderID": "10254", "ProductID": 5, "Quantity": 15, "UnitPrice": 21.35},
                    {"OrderID": "10255", "ProductID": 3, "Quantity": 20, "UnitPrice": 10.0},
                    {"OrderID": "10256", "ProductID": 7, "Quantity": 15, "UnitPrice": 30.0}
                ])),
            )
    }
}

/// Keep the object elements of a JSON array
fn rows(value: Value) -> Vec<Row> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(row) => Some(row),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
