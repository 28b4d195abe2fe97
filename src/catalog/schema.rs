//! Schema catalog: table name → ordered column descriptors
//!
//! Read-only. Consumed by schema display; the validator checks against the
//! dataset's sample rows rather than these descriptors.

use serde::{Deserialize, Serialize};

/// Declared column types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// UTF-8 text
    String,
    /// Whole number
    Integer,
    /// Fixed-point number
    Decimal,
    /// true / false
    Boolean,
    /// ISO-8601 date
    Date,
}

impl ColumnType {
    /// Returns the type name for display
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Integer => "integer",
            ColumnType::Decimal => "decimal",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
        }
    }
}

/// Target of a foreign key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    pub table: String,
    pub column: String,
}

/// One column of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<ForeignKeyRef>,
    #[serde(default)]
    pub description: String,
}

impl ColumnDescriptor {
    /// Plain column
    pub fn new(name: &str, column_type: ColumnType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            column_type,
            is_primary_key: false,
            is_foreign_key: false,
            references: None,
            description: description.to_string(),
        }
    }

    /// Mark as (part of) the primary key
    pub fn primary(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    /// Mark as a foreign key into `table.column`
    pub fn references(mut self, table: &str, column: &str) -> Self {
        self.is_foreign_key = true;
        self.references = Some(ForeignKeyRef {
            table: table.to_string(),
            column: column.to_string(),
        });
        self
    }
}

/// One table of the schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
}

impl TableSchema {
    /// Column names in declaration order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Primary key columns in declaration order
    pub fn primary_key(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.is_primary_key)
            .map(|c| c.name.as_str())
            .collect()
    }
}

/// Ordered set of table schemas
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaCatalog {
    tables: Vec<TableSchema>,
}

impl SchemaCatalog {
    /// Build from tables; order is preserved for display
    pub fn new(tables: Vec<TableSchema>) -> Self {
        Self { tables }
    }

    /// Table by exact name
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// All tables in declaration order
    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    /// Table names in declaration order
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    /// The bundled five-table sales schema
    pub fn northwind() -> Self {
        let table = |name: &str, columns: Vec<ColumnDescriptor>| TableSchema {
            name: name.to_string(),
            columns,
        };

        Self::new(vec![
            table(
                "Customers",
                vec![
                    ColumnDescriptor::new("CustomerID", ColumnType::String, "Unique identifier for customer").primary(),
                    ColumnDescriptor::new("CompanyName", ColumnType::String, "Name of the customer company"),
                    ColumnDescriptor::new("ContactName", ColumnType::String, "Name of the contact person"),
                    ColumnDescriptor::new("Country", ColumnType::String, "Country where the customer is located"),
                    ColumnDescriptor::new("Phone", ColumnType::String, "Phone number of the customer"),
                ],
            ),
            table(
                "Orders",
                vec![
                    ColumnDescriptor::new("OrderID", ColumnType::String, "Unique identifier for order").primary(),
                    ColumnDescriptor::new("CustomerID", ColumnType::String, "Reference to customer who placed the order")
                        .references("Customers", "CustomerID"),
                    ColumnDescriptor::new("OrderDate", ColumnType::Date, "Date when the order was placed"),
                    ColumnDescriptor::new("ShipCity", ColumnType::String, "City where the order was shipped"),
                    ColumnDescriptor::new("EmployeeID", ColumnType::Integer, "Reference to employee who processed the order")
                        .references("Employees", "EmployeeID"),
                ],
            ),
            table(
                "Products",
                vec![
                    ColumnDescriptor::new("ProductID", ColumnType::Integer, "Unique identifier for product").primary(),
                    ColumnDescriptor::new("ProductName", ColumnType::String, "Name of the product"),
                    ColumnDescriptor::new("UnitsInStock", ColumnType::Integer, "Number of units in stock"),
                    ColumnDescriptor::new("ReorderLevel", ColumnType::Integer, "Level at which product should be reordered"),
                    ColumnDescriptor::new("Discontinued", ColumnType::Boolean, "Whether the product is discontinued"),
                ],
            ),
            table(
                "Employees",
                vec![
                    ColumnDescriptor::new("EmployeeID", ColumnType::Integer, "Unique identifier for employee").primary(),
                    ColumnDescriptor::new("FirstName", ColumnType::String, "First name of the employee"),
                    ColumnDescriptor::new("LastName", ColumnType::String, "Last name of the employee"),
                ],
            ),
            table(
                "OrderDetails",
                vec![
                    ColumnDescriptor::new("OrderID", ColumnType::String, "Part of composite key, reference to order")
                        .primary()
                        .references("Orders", "OrderID"),
                    ColumnDescriptor::new("ProductID", ColumnType::Integer, "Part of composite key, reference to product")
                        .primary()
                        .references("Products", "ProductID"),
                    ColumnDescriptor::new("Quantity", ColumnType::Integer, "Quantity of product ordered"),
                    ColumnDescriptor::new("UnitPrice", ColumnType::Decimal, "Price per unit"),
                ],
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_northwind_tables_in_order() {
        let schema = SchemaCatalog::northwind();
        assert_eq!(
            schema.table_names(),
            vec!["Customers", "Orders", "Products", "Employees", "OrderDetails"]
        );
    }

    #[test]
    fn test_composite_primary_key() {
        let schema = SchemaCatalog::northwind();
        let details = schema.table("OrderDetails").unwrap();
        assert_eq!(details.primary_key(), vec!["OrderID", "ProductID"]);
        assert!(details.columns[0].is_foreign_key);
    }

    #[test]
    fn test_descriptor_serializes_camel_case() {
        let col = ColumnDescriptor::new("EmployeeID", ColumnType::Integer, "")
            .references("Employees", "EmployeeID");
        let json = serde_json::to_value(&col).unwrap();
        assert_eq!(json["type"], "integer");
        assert_eq!(json["isForeignKey"], true);
        assert_eq!(json["references"]["table"], "Employees");
    }

    #[test]
    fn test_unknown_table() {
        assert!(SchemaCatalog::northwind().table("customers").is_none());
    }
}
