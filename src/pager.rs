/// Размер страницы по умолчанию.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Видимое окно списка и доступность навигации.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub visible: &'a [T],
    /// Индекс страницы после ограничения диапазоном.
    pub index: usize,
    pub count: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Число страниц: `ceil(len / page_size)`.
pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1))
}

/// Окно `items[index*size .. index*size+size]`. Индекс за пределами
/// прижимается к последней странице, поэтому «Вперёд» на последней
/// странице и «Назад» на первой ничего не меняют.
pub fn paginate<T>(items: &[T], page_index: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let count = page_count(items.len(), page_size);
    let index = page_index.min(count.saturating_sub(1));

    let start = index * page_size;
    let end = (start + page_size).min(items.len());

    Page {
        visible: &items[start..end],
        index,
        count,
        has_prev: index > 0,
        has_next: (index + 1) * page_size < items.len(),
    }
}
