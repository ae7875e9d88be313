// ==========================================
// Manufacturing Scheduler - Order repository
// ==========================================
// Orders are created externally; the engine only reads them.
// Material requirements are loaded alongside their order.
// ==========================================

use crate::domain::order::{MaterialRequirement, ProductionOrder};
use crate::domain::types::OrderStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{format_ts, parse_ts};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// OrderRepository
// ==========================================
pub struct OrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OrderRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insert an order together with its material requirements.
    pub fn insert(&self, order: &ProductionOrder) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"INSERT INTO production_order (
                id, product_name, quantity, due_date, customer_priority, status
            ) VALUES (?, ?, ?, ?, ?, ?)"#,
            params![
                order.id,
                &order.product_name,
                order.quantity,
                format_ts(order.due_date),
                order.customer_priority,
                order.status.as_str(),
            ],
        )?;

        for req in &order.required_materials {
            conn.execute(
                r#"INSERT INTO material_requirement (
                    order_id, material_id, material_name, quantity_required
                ) VALUES (?, ?, ?, ?)"#,
                params![
                    order.id,
                    req.material_id,
                    &req.material_name,
                    req.quantity_required,
                ],
            )?;
        }

        Ok(order.id)
    }

    /// Orders in an active lifecycle state (Planned or InProgress),
    /// i.e. the allocator's input set.
    pub fn get_active_orders(&self) -> RepositoryResult<Vec<ProductionOrder>> {
        self.query_orders("WHERE status IN ('PLANNED', 'IN_PROGRESS')")
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<ProductionOrder>> {
        self.query_orders("")
    }

    pub fn find_by_id(&self, order_id: i64) -> RepositoryResult<Option<ProductionOrder>> {
        let mut orders = self.query_orders_with_param("WHERE id = ?", order_id)?;
        Ok(orders.pop())
    }

    fn query_orders(&self, where_clause: &str) -> RepositoryResult<Vec<ProductionOrder>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT id, product_name, quantity, due_date, customer_priority, status \
             FROM production_order {} ORDER BY id",
            where_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], map_order_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut orders = Vec::with_capacity(rows.len());
        for raw in rows {
            orders.push(self.hydrate(&conn, raw)?);
        }
        Ok(orders)
    }

    fn query_orders_with_param(
        &self,
        where_clause: &str,
        param: i64,
    ) -> RepositoryResult<Vec<ProductionOrder>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT id, product_name, quantity, due_date, customer_priority, status \
             FROM production_order {} ORDER BY id",
            where_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![param], map_order_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut orders = Vec::with_capacity(rows.len());
        for raw in rows {
            orders.push(self.hydrate(&conn, raw)?);
        }
        Ok(orders)
    }

    /// Turn a raw row into a domain order, attaching requirements.
    fn hydrate(&self, conn: &Connection, raw: RawOrderRow) -> RepositoryResult<ProductionOrder> {
        let status = OrderStatus::parse(&raw.status).ok_or_else(|| {
            RepositoryError::ValidationError(format!(
                "unknown order status '{}' for order {}",
                raw.status, raw.id
            ))
        })?;

        let mut stmt = conn.prepare(
            r#"SELECT id, material_id, material_name, quantity_required
               FROM material_requirement WHERE order_id = ? ORDER BY id"#,
        )?;
        let required_materials = stmt
            .query_map(params![raw.id], |row| {
                Ok(MaterialRequirement {
                    id: row.get(0)?,
                    material_id: row.get(1)?,
                    material_name: row.get(2)?,
                    quantity_required: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProductionOrder {
            id: raw.id,
            product_name: raw.product_name,
            quantity: raw.quantity,
            due_date: parse_ts(&raw.due_date)?,
            customer_priority: raw.customer_priority,
            status,
            required_materials,
        })
    }
}

struct RawOrderRow {
    id: i64,
    product_name: String,
    quantity: i64,
    due_date: String,
    customer_priority: i32,
    status: String,
}

fn map_order_row(row: &Row<'_>) -> rusqlite::Result<RawOrderRow> {
    Ok(RawOrderRow {
        id: row.get(0)?,
        product_name: row.get(1)?,
        quantity: row.get(2)?,
        due_date: row.get(3)?,
        customer_priority: row.get(4)?,
        status: row.get(5)?,
    })
}
