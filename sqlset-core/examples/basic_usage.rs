use sqlset_core::{c, count, dialect, from, i, on, record, star, ConflictExpression, Ex, Op, TruncateOptions};

fn main() -> sqlset_core::Result<()> {
    // SELECT with a map-style filter and an explicit expression
    let users = from("users")
        .select(("id", "name", "email"))
        .where_(Ex::new().eq("status", "active").op("age", Op::gt(18)))
        .where_(c("city").like("%York%"))
        .order(c("name").asc())
        .limit(10)
        .offset(5);

    let (sql, _) = users.to_sql()?;
    println!("SELECT SQL: {}", sql);

    // The same dataset, prepared against postgres
    let pg = dialect("postgres");
    let (sql, args) = users.with_dialect(pg.dialect().clone()).prepared(true).to_sql()?;
    println!("Prepared SQL: {}", sql);
    println!("Arguments: {:?}", args);

    // Joins, grouping and aggregates
    let per_user = from("orders")
        .select((i("users.name"), count(star()).as_("orders")))
        .inner_join("users", on(i("orders.user_id").eq(i("users.id"))))
        .group_by("users.name")
        .having(count(star()).gt(3));
    println!("GROUP SQL: {}", per_user.to_sql()?.0);

    // INSERT with an upsert
    let insert = from("users").to_insert_conflict_sql(
        ConflictExpression::do_update("email", record! { "name" => "John Doe" }),
        vec![
            record! { "name" => "John Doe", "email" => "john@example.com" },
            record! { "name" => "Jane Doe", "email" => "jane@example.com" },
        ],
    )?;
    println!("INSERT SQL: {}", insert.0);

    // UPDATE, DELETE and TRUNCATE share the dataset's filters
    let stale = from("sessions").where_(c("expires_at").lt(c("now")));
    println!("UPDATE SQL: {}", stale.to_update_sql(record! { "active" => false })?.0);
    println!("DELETE SQL: {}", stale.to_delete_sql()?.0);
    println!(
        "TRUNCATE SQL: {}",
        from("sessions")
            .to_truncate_with_opts_sql(TruncateOptions { cascade: true, ..Default::default() })?
            .0
    );

    // Dialect differences
    for name in ["default", "postgres", "mysql", "sqlite3"] {
        let (sql, _) = dialect(name)
            .from("items")
            .where_(c("name").ilike("a%"))
            .to_sql()?;
        println!("{:>8}: {}", name, sql);
    }

    Ok(())
}
