use sqlforge_core::{
    add, assign, delete, equal, in_, incr, insert, is_null, like, on, op, or, raw, select,
    update, DialectRegistry, MySql, Operator, Postgres, QueryBuilder, Result, Sqlite3, Value,
};

fn show(label: &str, query: &impl QueryBuilder) -> Result<()> {
    let (sql, args) = query.build()?;
    println!("{label}:\n  {sql}\n  args: {}", Value::Array(args));
    Ok(())
}

fn main() -> Result<()> {
    // SELECT with joins, conditions and pagination
    let select_query = select("u.id")
        .select_as("p.display_name", "name")
        .dialect(Postgres)
        .from_as("users", "u")
        .join_left("profiles", "p", [on("u.id", "p.user_id")])
        .where_(("u.age", op::GT, 18))
        .where_(("u.status", "active"))
        .where_(like("u.city", "%York%"))
        .order_by_desc("u.created_at")
        .paginate(2, 10);
    show("SELECT", &select_query)?;

    // INSERT with several rows
    let insert_query = insert()
        .dialect(MySql)
        .into_table("users")
        .columns(("name", "email", "age"))
        .values(vec![Value::from("John Doe"), Value::from("john@example.com"), Value::from(30)])?
        .values(vec![Value::from("Jane Roe"), Value::from("jane@example.com"), Value::from(28)])?;
    show("INSERT", &insert_query)?;

    // UPDATE mixing bound values, inline increments and raw expressions
    let update_query = update()
        .dialect(MySql)
        .table("users")
        .set([assign("email", "new@example.com"), incr("login_count"), add("credits", 5)])
        .set(raw("updated_at", "NOW()"))
        .where_(equal("id", 123));
    show("UPDATE", &update_query)?;

    // DELETE with nested conditions
    let delete_query = delete()
        .dialect(Sqlite3)
        .from("sessions")
        .where_(or([is_null("user_id"), in_("state", ["expired", "revoked"])]));
    show("DELETE", &delete_query)?;

    // Custom operators for database-specific features
    let fts_query = select("title")
        .dialect(Postgres)
        .from("documents")
        .where_(("content", Operator::custom("@@"), "search query"))
        .limit(20);
    show("PostgreSQL FTS", &fts_query)?;

    // Dialects are looked up by name
    let registry = DialectRegistry::with_builtins();
    for name in registry.names() {
        if let Some(dialect) = registry.get(&name) {
            let sql = select("COUNT(t.id)").dialect(dialect).from("t").to_sql()?;
            println!("{name}: {sql}");
        }
    }

    Ok(())
}
