use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{
    Booking, BookingLedger, BookingRequest, BookingStatus, CalendarDate, RequesterDetails,
    TimeOfDay,
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ── Ledger ──

/// Confirmed bookings and blocked slots between `from` and `to`, inclusive.
pub fn load_ledger(
    conn: &Connection,
    from: CalendarDate,
    to: CalendarDate,
) -> anyhow::Result<BookingLedger> {
    let mut stmt = conn.prepare(
        "SELECT slot_date, slot_time FROM bookings
         WHERE status = 'confirmed' AND slot_date >= ?1 AND slot_date <= ?2
         UNION
         SELECT slot_date, slot_time FROM blocked_slots
         WHERE slot_date >= ?1 AND slot_date <= ?2",
    )?;

    let rows = stmt.query_map(params![from.key(), to.key()], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut ledger = BookingLedger::new();
    for row in rows {
        let (date, time) = row?;
        if let Err(e) = ledger.insert_keys(&date, &time) {
            tracing::warn!(error = %e, date = %date, time = %time, "skipping malformed ledger row");
        }
    }
    Ok(ledger)
}

pub fn load_ledger_for_date(
    conn: &Connection,
    date: CalendarDate,
) -> anyhow::Result<BookingLedger> {
    load_ledger(conn, date, date)
}

// ── Bookings ──

pub fn create_booking(conn: &Connection, request: &BookingRequest) -> anyhow::Result<()> {
    let created_at = request.created_at.format(TIMESTAMP_FORMAT).to_string();

    conn.execute(
        "INSERT INTO bookings (id, slot_date, slot_time, name, email, role, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
        params![
            request.id,
            request.date.key(),
            request.time.key(),
            request.requester.name,
            request.requester.email,
            request.requester.role,
            BookingStatus::Confirmed.as_str(),
            created_at,
        ],
    )?;
    Ok(())
}

pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: &BookingStatus,
) -> anyhow::Result<bool> {
    let now = Utc::now().naive_utc().format(TIMESTAMP_FORMAT).to_string();
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now, id],
    )?;
    Ok(count > 0)
}

pub fn get_all_bookings(
    conn: &Connection,
    status_filter: Option<&str>,
    limit: i64,
) -> anyhow::Result<Vec<Booking>> {
    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match status_filter {
        Some(status) => (
            "SELECT id, slot_date, slot_time, name, email, role, status, created_at, updated_at \
             FROM bookings WHERE status = ?1 ORDER BY slot_date DESC, slot_time DESC LIMIT ?2"
                .to_string(),
            vec![
                Box::new(status.to_string()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit),
            ],
        ),
        None => (
            "SELECT id, slot_date, slot_time, name, email, role, status, created_at, updated_at \
             FROM bookings ORDER BY slot_date DESC, slot_time DESC LIMIT ?1"
                .to_string(),
            vec![Box::new(limit) as Box<dyn rusqlite::types::ToSql>],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        "SELECT id, slot_date, slot_time, name, email, role, status, created_at, updated_at \
         FROM bookings WHERE id = ?1",
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: String = row.get(0)?;
    let date_str: String = row.get(1)?;
    let time_str: String = row.get(2)?;
    let name: String = row.get(3)?;
    let email: String = row.get(4)?;
    let role: String = row.get(5)?;
    let status_str: String = row.get(6)?;
    let created_at_str: String = row.get(7)?;
    let updated_at_str: String = row.get(8)?;

    let created_at = NaiveDateTime::parse_from_str(&created_at_str, TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| Utc::now().naive_utc());
    let updated_at = NaiveDateTime::parse_from_str(&updated_at_str, TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Booking {
        id,
        date: CalendarDate::parse_key(&date_str)?,
        time: TimeOfDay::parse(&time_str)?,
        requester: RequesterDetails { name, email, role },
        status: BookingStatus::parse(&status_str),
        created_at,
        updated_at,
    })
}

// ── Blocked Slots ──

pub fn block_slot(
    conn: &Connection,
    date: CalendarDate,
    time: TimeOfDay,
    reason: Option<&str>,
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO blocked_slots (slot_date, slot_time, reason) VALUES (?1, ?2, ?3)
         ON CONFLICT(slot_date, slot_time) DO UPDATE SET reason = excluded.reason",
        params![date.key(), time.key(), reason],
    )?;
    Ok(())
}

pub fn unblock_slot(
    conn: &Connection,
    date: CalendarDate,
    time: TimeOfDay,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "DELETE FROM blocked_slots WHERE slot_date = ?1 AND slot_time = ?2",
        params![date.key(), time.key()],
    )?;
    Ok(count > 0)
}

pub struct BlockedSlot {
    pub date: CalendarDate,
    pub time: TimeOfDay,
    pub reason: Option<String>,
}

pub fn list_blocked(conn: &Connection) -> anyhow::Result<Vec<BlockedSlot>> {
    let mut stmt = conn.prepare(
        "SELECT slot_date, slot_time, reason FROM blocked_slots ORDER BY slot_date, slot_time",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
        ))
    })?;

    let mut blocked = vec![];
    for row in rows {
        let (date, time, reason) = row?;
        blocked.push(BlockedSlot {
            date: CalendarDate::parse_key(&date)?,
            time: TimeOfDay::parse(&time)?,
            reason,
        });
    }
    Ok(blocked)
}
