/*
 * Responsibility
 * - Render an UpdateSet into `col = $n, ...` for a single UPDATE statement
 * - Column names come from compile-time allow-lists, values are always bound
 */
use sqlx::{Postgres, QueryBuilder};

use crate::services::partial_update::{FieldValue, UpdateSet};

pub fn push_assignments(builder: &mut QueryBuilder<'_, Postgres>, set: &UpdateSet) {
    let mut assignments = builder.separated(", ");
    for (column, value) in set.iter() {
        assignments.push(column);
        assignments.push_unseparated(" = ");
        match value {
            FieldValue::Text(v) => {
                assignments.push_bind_unseparated(v.clone());
            }
            FieldValue::Bool(v) => {
                assignments.push_bind_unseparated(*v);
            }
            FieldValue::Null => {
                assignments.push_unseparated("NULL");
            }
        }
    }
}
