/// A candidate lists at most this many emergency contacts.
pub const MAX_EMERGENCY_CONTACTS: i64 = 3;

/// `order` for a new contact: the current list length. Deleting a contact does
/// not renumber the others, so gaps in `order` are expected.
pub fn next_order(current_count: i64) -> Result<i32, String> {
    if current_count >= MAX_EMERGENCY_CONTACTS {
        return Err(format!(
            "You can add up to {MAX_EMERGENCY_CONTACTS} emergency contacts"
        ));
    }
    Ok(current_count as i32)
}
