//! Offset/limit over two collections read as one sequence.

/// Page size used when only an offset is supplied.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// One page of the logical sequence `[books..., notes...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<B, N> {
    pub books: Vec<B>,
    pub notes: Vec<N>,
    /// Length of both collections before slicing.
    pub total: usize,
}

/// Slices `books` then `notes` as if they were concatenated.
///
/// With neither `offset` nor `limit`, both collections are returned whole.
/// Any `Some` turns pagination on, `Some(0)` included: `Some(0)` as offset
/// with no limit yields a first page of [`DEFAULT_PAGE_SIZE`], and a limit
/// of `Some(0)` yields an empty page. Books fill the page from `offset`
/// first, and any remaining capacity is taken from notes starting at
/// `offset - books.len()` (clamped at zero).
///
/// # Examples
///
/// ```
/// use shelf::search::paginate;
///
/// let page = paginate(vec![1, 2, 3], vec!['a', 'b', 'c'], Some(2), Some(3));
/// assert_eq!(page.books, vec![3]);
/// assert_eq!(page.notes, vec!['a', 'b']);
/// assert_eq!(page.total, 6);
/// ```
pub fn paginate<B, N>(
    mut books: Vec<B>,
    mut notes: Vec<N>,
    offset: Option<usize>,
    limit: Option<usize>,
) -> Page<B, N> {
    let total = books.len() + notes.len();
    if offset.is_none() && limit.is_none() {
        return Page {
            books,
            notes,
            total,
        };
    }

    let offset = offset.unwrap_or(0);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);
    let books_len = books.len();

    keep_window(&mut books, offset, limit);
    let remaining = limit - books.len();
    if remaining > 0 {
        keep_window(&mut notes, offset.saturating_sub(books_len), remaining);
    } else {
        notes.clear();
    }

    Page {
        books,
        notes,
        total,
    }
}

/// Truncates `items` to `[start, start + len)`, clamped to its bounds.
fn keep_window<T>(items: &mut Vec<T>, start: usize, len: usize) {
    let start = start.min(items.len());
    let end = start.saturating_add(len).min(items.len());
    items.truncate(end);
    items.drain(..start);
}
