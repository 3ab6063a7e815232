//! SQL text synthesis for [`Select`].

use super::{CountMode, Filter, Select, TableRef};
use crate::quote::{expand_fields, quote_identifier};

fn write_table(out: &mut String, table: &TableRef) {
    out.push('`');
    out.push_str(table.table());
    out.push('`');
    if let Some(alias) = table.alias() {
        out.push(' ');
        out.push_str(alias);
    }
}

fn write_filters(out: &mut String, keyword: &str, filters: &[Filter]) {
    for (i, filter) in filters.iter().enumerate() {
        if i == 0 {
            out.push(' ');
            out.push_str(keyword);
            out.push(' ');
        } else {
            out.push(' ');
            out.push_str(filter.connective.as_sql());
            out.push(' ');
        }
        out.push_str(&filter.sql);
    }
}

pub(super) fn render(select: &Select) -> String {
    let mut fields = String::new();
    let mut from = String::new();

    for source in &select.sources {
        if !from.is_empty() {
            from.push(',');
        }
        write_table(&mut from, &source.table);
        expand_fields(
            &mut fields,
            source.fields.iter().chain(select.columns.iter()),
            source.table.alias(),
        );
    }

    let mut joins = String::new();
    for join in &select.joins {
        expand_fields(&mut fields, join.fields.iter(), join.table.alias());
        joins.push(' ');
        joins.push_str(join.kind.as_sql());
        joins.push(' ');
        write_table(&mut joins, &join.table);
        joins.push_str(" ON ");
        joins.push_str(&join.on);
    }

    // Everything after the SELECT list: FROM .. LIMIT
    let mut body = String::with_capacity(64);
    body.push_str(" FROM ");
    body.push_str(&from);
    body.push_str(&joins);
    write_filters(&mut body, "WHERE", &select.where_filters);

    if !select.group.is_empty() {
        body.push_str(" GROUP BY ");
        let group: Vec<String> = select.group.iter().map(|g| quote_identifier(g)).collect();
        body.push_str(&group.join(","));
    }

    write_filters(&mut body, "HAVING", &select.having_filters);

    if !select.order.is_empty() && !select.count.is_active() {
        body.push_str(" ORDER BY ");
        for (i, order) in select.order.iter().enumerate() {
            if i > 0 {
                body.push(',');
            }
            body.push_str(&quote_identifier(&order.expr));
            if order.desc {
                body.push_str(" DESC");
            }
        }
    }

    if let Some(limit) = select.limit {
        body.push_str(" LIMIT ");
        if let Some(skip) = limit.skip {
            body.push_str(&skip.to_string());
            body.push(',');
        }
        body.push_str(&limit.count.to_string());
    }

    let count_head = match &select.count {
        CountMode::None => None,
        CountMode::All => Some("COUNT(*)".to_string()),
        CountMode::Distinct(field) => Some(format!("COUNT(DISTINCT {field})")),
    };

    match count_head {
        Some(head) if !select.unions.is_empty() => {
            format!("SELECT {head} FROM (SELECT {fields}{body}) AS u")
        }
        Some(head) => {
            // The field list is irrelevant for a plain count.
            format!("SELECT {head}{body}")
        }
        None => {
            let distinct = if select.distinct { "DISTINCT " } else { "" };
            let base = format!("SELECT {distinct}{fields}{body}");
            if select.unions.is_empty() {
                return base;
            }

            let mut sql = String::with_capacity(base.len() * (select.unions.len() + 1) + 16);
            sql.push('(');
            sql.push_str(&base);
            sql.push(')');
            for union in &select.unions {
                sql.push_str(if union.all { " UNION ALL (" } else { " UNION (" });
                sql.push_str(&union.select.to_sql());
                sql.push(')');
            }
            sql
        }
    }
}
