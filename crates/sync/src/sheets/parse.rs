//! Parsing of the spreadsheet export into raw rows.
//!
//! The public export serves either plain CSV or a gviz JSON envelope
//! depending on how the request is routed; both transports land in the same
//! [`SheetRow`] shape here.
//!
//! Logical columns are located by case-insensitive synonym matching against
//! the header row. Sheets authored before the header conventions existed
//! carry no recognizable headers at all; those fall back to the classic
//! positional A–I column layout.

use serde::Deserialize;

use super::{SheetError, SheetRow};

/// Logical columns the pipeline consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    OrderId,
    CustomerName,
    Phone,
    Address,
    City,
    ProductName,
    Sku,
    Quantity,
    Price,
}

impl Column {
    const ALL: [Self; 9] = [
        Self::OrderId,
        Self::CustomerName,
        Self::Phone,
        Self::Address,
        Self::City,
        Self::ProductName,
        Self::Sku,
        Self::Quantity,
        Self::Price,
    ];

    /// Known header spellings, checked as case-insensitive substrings.
    const fn synonyms(self) -> &'static [&'static str] {
        match self {
            Self::OrderId => &["order id", "orderid", "order number", "ordernumber"],
            Self::CustomerName => &["customer name", "full name", "fullname", "name"],
            Self::Phone => &["phone", "phone number", "contact"],
            Self::Address => &["address", "shipping address"],
            Self::City => &["city", "town", "location"],
            Self::ProductName => &["product name", "item", "product"],
            Self::Sku => &["sku", "product code", "item code"],
            Self::Quantity => &["quantity", "total quantity", "qty"],
            Self::Price => &["price", "total charge", "amount"],
        }
    }
}

/// Resolved mapping from logical columns to cell positions.
#[derive(Debug, Clone)]
struct HeaderMap {
    positions: [Option<usize>; 9],
}

impl HeaderMap {
    /// Build a mapping by matching header cells against known synonyms.
    /// The first cell matching any synonym of a column wins; a column may
    /// stay unmapped.
    fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut positions = [None; 9];
        for (slot, column) in Column::ALL.iter().enumerate() {
            let found = headers.iter().position(|h| {
                let header = h.as_ref().trim().to_lowercase();
                !header.is_empty()
                    && column
                        .synonyms()
                        .iter()
                        .any(|synonym| header.contains(synonym))
            });
            if let Some(p) = positions.get_mut(slot) {
                *p = found;
            }
        }
        Self { positions }
    }

    /// The classic A–I layout used by sheets without recognizable headers:
    /// order id, customer name, phone, address, city, product name, SKU,
    /// quantity, price.
    const fn positional() -> Self {
        Self {
            positions: [
                Some(0),
                Some(1),
                Some(2),
                Some(3),
                Some(4),
                Some(5),
                Some(6),
                Some(7),
                Some(8),
            ],
        }
    }

    /// A header row that cannot even locate the order-id column is not a
    /// header row at all.
    fn is_usable(&self) -> bool {
        self.position(Column::OrderId).is_some()
    }

    fn position(&self, column: Column) -> Option<usize> {
        let slot = Column::ALL.iter().position(|c| *c == column)?;
        self.positions.get(slot).copied().flatten()
    }

    /// Extract and tidy one cell: trimmed, surrounding quotes removed,
    /// blank mapped to `None`.
    fn cell<S: AsRef<str>>(&self, cells: &[S], column: Column) -> Option<String> {
        let position = self.position(column)?;
        let raw = cells.get(position)?.as_ref();
        let tidy = raw.trim().trim_matches('"').trim();
        if tidy.is_empty() {
            None
        } else {
            Some(tidy.to_owned())
        }
    }

    fn row<S: AsRef<str>>(&self, index: usize, cells: &[S]) -> SheetRow {
        SheetRow {
            index,
            order_id: self.cell(cells, Column::OrderId),
            customer_name: self.cell(cells, Column::CustomerName),
            phone: self.cell(cells, Column::Phone),
            address: self.cell(cells, Column::Address),
            city: self.cell(cells, Column::City),
            product_name: self.cell(cells, Column::ProductName),
            sku: self.cell(cells, Column::Sku),
            quantity: self.cell(cells, Column::Quantity),
            unit_price: self.cell(cells, Column::Price),
        }
    }
}

/// Map header + data records into rows, dropping blank export artifacts.
fn collect_rows<S: AsRef<str>>(header: &[S], data: &[Vec<S>]) -> Vec<SheetRow> {
    let by_name = HeaderMap::from_headers(header);
    let map = if by_name.is_usable() {
        by_name
    } else {
        HeaderMap::positional()
    };

    let mut rows = Vec::with_capacity(data.len());
    let mut index = 0;
    for cells in data {
        index += 1;
        let row = map.row(index, cells);
        if !row.is_blank() {
            rows.push(row);
        }
    }
    rows
}

/// Parse the CSV transport. The first record is the header row.
pub(super) fn parse_csv(body: &str) -> Result<Vec<SheetRow>, SheetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut records: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| SheetError::Format(e.to_string()))?;
        records.push(record.iter().map(str::to_owned).collect());
    }

    let mut iter = records.into_iter();
    let header = iter
        .next()
        .ok_or_else(|| SheetError::Format("export contains no rows".to_owned()))?;
    let data: Vec<Vec<String>> = iter.collect();

    Ok(collect_rows(&header, &data))
}

// =============================================================================
// gviz JSON transport
// =============================================================================

#[derive(Debug, Deserialize)]
struct GvizResponse {
    table: GvizTable,
}

#[derive(Debug, Deserialize)]
struct GvizTable {
    #[serde(default)]
    cols: Vec<GvizCol>,
    #[serde(default)]
    rows: Vec<GvizRow>,
}

#[derive(Debug, Deserialize)]
struct GvizCol {
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GvizRow {
    #[serde(default)]
    c: Option<Vec<Option<GvizCell>>>,
}

#[derive(Debug, Deserialize)]
struct GvizCell {
    #[serde(default)]
    v: serde_json::Value,
}

impl GvizRow {
    fn cells(&self) -> Vec<String> {
        self.c
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|cell| cell.as_ref().map(GvizCell::text).unwrap_or_default())
            .collect()
    }
}

impl GvizCell {
    fn text(&self) -> String {
        match &self.v {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            _ => String::new(),
        }
    }
}

/// True when the body is the gviz JSON envelope rather than CSV.
pub(super) fn looks_like_gviz(body: &str) -> bool {
    let trimmed = body.trim_start();
    trimmed.starts_with("/*O_o*/")
        || trimmed.starts_with('{')
        || trimmed.contains("google.visualization.Query.setResponse")
}

/// Parse the JSON transport.
///
/// The export wraps the payload in a JS callback
/// (`google.visualization.Query.setResponse({...});`); the JSON object is
/// carved out between the first `{` and the last `}`.
///
/// Header detection: non-empty column labels win; sheets that declare no
/// header band put the header text in the first data row instead.
pub(super) fn parse_gviz_json(body: &str) -> Result<Vec<SheetRow>, SheetError> {
    let start = body
        .find('{')
        .ok_or_else(|| SheetError::Format("no JSON object in export response".to_owned()))?;
    let end = body
        .rfind('}')
        .ok_or_else(|| SheetError::Format("no JSON object in export response".to_owned()))?;
    let json = body
        .get(start..=end)
        .ok_or_else(|| SheetError::Format("malformed JSON envelope".to_owned()))?;

    let response: GvizResponse =
        serde_json::from_str(json).map_err(|e| SheetError::Format(e.to_string()))?;

    let labels: Vec<String> = response
        .table
        .cols
        .iter()
        .map(|col| col.label.clone().unwrap_or_default())
        .collect();
    let labeled = labels.iter().any(|l| !l.trim().is_empty());

    let all_rows: Vec<Vec<String>> = response.table.rows.iter().map(GvizRow::cells).collect();

    if labeled {
        Ok(collect_rows(&labels, &all_rows))
    } else {
        let mut iter = all_rows.into_iter();
        let header = iter
            .next()
            .ok_or_else(|| SheetError::Format("export contains no rows".to_owned()))?;
        let data: Vec<Vec<String>> = iter.collect();
        Ok(collect_rows(&header, &data))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CSV_WITH_HEADERS: &str = "\
\"Order ID\",\"Customer Name\",\"Phone Number\",\"Address\",\"City\",\"Product Name\",\"SKU\",\"Quantity\",\"Price\"
\"1001\",\"Rana Khoury\",\"70123456\",\"Main St\",\"Beirut\",\"Olive Soap\",\"ABC\",\"2\",\"9.50\"
\"1002\",\"Omar Haddad\",\"03456789\",\"\",\"Tripoli\",\"Cedar Honey\",\"DEF\",\"\",\"24\"
";

    #[test]
    fn test_csv_header_synonyms() {
        let rows = parse_csv(CSV_WITH_HEADERS).unwrap();
        assert_eq!(rows.len(), 2);

        let first = rows.first().unwrap();
        assert_eq!(first.index, 1);
        assert_eq!(first.order_id.as_deref(), Some("1001"));
        assert_eq!(first.customer_name.as_deref(), Some("Rana Khoury"));
        assert_eq!(first.phone.as_deref(), Some("70123456"));
        assert_eq!(first.sku.as_deref(), Some("ABC"));
        assert_eq!(first.quantity.as_deref(), Some("2"));
        assert_eq!(first.unit_price.as_deref(), Some("9.50"));
    }

    #[test]
    fn test_csv_blank_cells_become_none() {
        let rows = parse_csv(CSV_WITH_HEADERS).unwrap();
        let second = rows.get(1).unwrap();
        assert_eq!(second.index, 2);
        assert_eq!(second.address, None);
        assert_eq!(second.quantity, None);
    }

    #[test]
    fn test_csv_positional_fallback() {
        // No recognizable header: first row is real data in the A–I layout
        let body = "\
9,Lina,70111222,Street,Saida,Soap,XYZ,1,5
10,Maya,71222333,Street,Jounieh,Honey,QRS,3,12
";
        let rows = parse_csv(body).unwrap();
        // First row is consumed as the (unusable) header; remaining rows map
        // positionally
        assert_eq!(rows.len(), 1);
        let row = rows.first().unwrap();
        assert_eq!(row.order_id.as_deref(), Some("10"));
        assert_eq!(row.sku.as_deref(), Some("QRS"));
    }

    #[test]
    fn test_csv_trailing_blank_rows_dropped() {
        let body = "\
Order ID,Name,Phone,SKU
5,Rana,70123456,ABC
,,,
";
        let rows = parse_csv(body).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_header_map_prefers_first_match() {
        let headers = ["Order Number", "Full name", "Contact", "Location"];
        let map = HeaderMap::from_headers(&headers);
        assert_eq!(map.position(Column::OrderId), Some(0));
        assert_eq!(map.position(Column::CustomerName), Some(1));
        assert_eq!(map.position(Column::Phone), Some(2));
        assert_eq!(map.position(Column::City), Some(3));
        assert_eq!(map.position(Column::Sku), None);
    }

    #[test]
    fn test_gviz_detection() {
        assert!(looks_like_gviz(
            "/*O_o*/\ngoogle.visualization.Query.setResponse({});"
        ));
        assert!(looks_like_gviz("{\"table\":{}}"));
        assert!(!looks_like_gviz("Order ID,Name\n1,Rana"));
    }

    #[test]
    fn test_gviz_json_with_labels() {
        let body = concat!(
            "/*O_o*/\ngoogle.visualization.Query.setResponse(",
            r#"{"table":{"cols":[{"label":"Order ID"},{"label":"Customer Name"},{"label":"Phone"},{"label":"SKU"},{"label":"Price"}],"#,
            r#""rows":[{"c":[{"v":1001},{"v":"Rana"},{"v":"70123456"},{"v":"ABC"},{"v":9.5}]}]}}"#,
            ");"
        );
        let rows = parse_gviz_json(body).unwrap();
        assert_eq!(rows.len(), 1);
        let row = rows.first().unwrap();
        assert_eq!(row.order_id.as_deref(), Some("1001"));
        assert_eq!(row.unit_price.as_deref(), Some("9.5"));
    }

    #[test]
    fn test_gviz_json_headers_in_first_row() {
        let body = concat!(
            r#"{"table":{"cols":[{"label":""},{"label":""},{"label":""},{"label":""}],"#,
            r#""rows":["#,
            r#"{"c":[{"v":"Order ID"},{"v":"Name"},{"v":"Phone"},{"v":"SKU"}]},"#,
            r#"{"c":[{"v":"77"},{"v":"Omar"},{"v":"03123456"},{"v":"DEF"}]}"#,
            r#"]}}"#
        );
        let rows = parse_gviz_json(body).unwrap();
        assert_eq!(rows.len(), 1);
        let row = rows.first().unwrap();
        assert_eq!(row.index, 1);
        assert_eq!(row.order_id.as_deref(), Some("77"));
        assert_eq!(row.customer_name.as_deref(), Some("Omar"));
    }

    #[test]
    fn test_gviz_json_null_cells() {
        let body = concat!(
            r#"{"table":{"cols":[{"label":"Order ID"},{"label":"Name"},{"label":"Phone"}],"#,
            r#""rows":[{"c":[{"v":5},null,{"v":"70123456"}]}]}}"#
        );
        let rows = parse_gviz_json(body).unwrap();
        let row = rows.first().unwrap();
        assert_eq!(row.order_id.as_deref(), Some("5"));
        assert_eq!(row.customer_name, None);
    }

    #[test]
    fn test_gviz_garbage_is_format_error() {
        assert!(matches!(
            parse_gviz_json("{not json"),
            Err(SheetError::Format(_))
        ));
    }
}
