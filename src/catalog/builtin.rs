//! Built-in example queries
//!
//! Seeded into the saved-query store as protected entries.

use serde::{Deserialize, Serialize};

/// A bundled example query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltinQuery {
    pub id: String,
    pub name: String,
    pub description: String,
    pub query: String,
}

impl BuiltinQuery {
    fn new(index: usize, name: &str, description: &str, query: &str) -> Self {
        Self {
            id: format!("builtin-{}", index),
            name: name.to_string(),
            description: description.to_string(),
            query: query.to_string(),
        }
    }
}

/// The six bundled examples, simple ones first
pub fn builtin_queries() -> Vec<BuiltinQuery> {
    vec![
        BuiltinQuery::new(
            0,
            "Customers by Country",
            "List all customers grouped by country",
            "SELECT Country, COUNT(*) as CustomerCount FROM Customers GROUP BY Country ORDER BY CustomerCount DESC;",
        ),
        BuiltinQuery::new(
            1,
            "Low Stock Products",
            "Find products with stock below reorder level",
            "SELECT ProductID, ProductName, UnitsInStock, ReorderLevel FROM Products WHERE UnitsInStock < ReorderLevel AND Discontinued = 0 ORDER BY UnitsInStock ASC;",
        ),
        BuiltinQuery::new(
            2,
            "Top Selling Products",
            "Calculate total sales and quantity ordered for each product",
            "SELECT p.ProductID, p.ProductName, SUM(od.Quantity) as TotalQuantity, SUM(od.Quantity * od.UnitPrice) as TotalSales FROM Products p JOIN OrderDetails od ON p.ProductID = od.ProductID GROUP BY p.ProductID, p.ProductName ORDER BY TotalSales DESC LIMIT 10;",
        ),
        BuiltinQuery::new(
            3,
            "Customer Order Analysis",
            "Detailed order statistics for each customer",
            "SELECT c.CustomerID, c.CompanyName, c.Country, COUNT(DISTINCT o.OrderID) as OrderCount, SUM(od.Quantity * od.UnitPrice) as TotalSpent, AVG(od.Quantity * od.UnitPrice) as AvgOrderValue FROM Customers c JOIN Orders o ON c.CustomerID = o.CustomerID JOIN OrderDetails od ON o.OrderID = od.OrderID GROUP BY c.CustomerID, c.CompanyName, c.Country ORDER BY TotalSpent DESC;",
        ),
        BuiltinQuery::new(
            4,
            "Sales Performance by Region",
            "Analyze sales performance across different shipping regions",
            "SELECT o.ShipCity, COUNT(DISTINCT o.OrderID) as OrderCount, SUM(od.Quantity) as TotalItemsOrdered, SUM(od.Quantity * od.UnitPrice) as TotalRevenue, AVG(od.UnitPrice) as AvgUnitPrice FROM Orders o JOIN OrderDetails od ON o.OrderID = od.OrderID JOIN Products p ON od.ProductID = p.ProductID GROUP BY o.ShipCity ORDER BY TotalRevenue DESC LIMIT 15;",
        ),
        BuiltinQuery::new(
            5,
            "Employee Sales Summary",
            "Basic summary of sales by employee",
            "SELECT e.EmployeeID, e.FirstName, e.LastName, COUNT(o.OrderID) as TotalOrders FROM Employees e LEFT JOIN Orders o ON e.EmployeeID = o.EmployeeID GROUP BY e.EmployeeID, e.FirstName, e.LastName ORDER BY TotalOrders DESC;",
        ),
    ]
}
