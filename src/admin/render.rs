//! 表格渲染模型
//!
//! 每个页面把当前状态转换为 [`Table`]，CLI 直接打印文本，其他前端可以自行渲染。

/// 表格中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRow {
    Cells(Vec<String>),
    /// 空列表时的占位行，横跨所有列
    Placeholder { text: String, colspan: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub placeholder: String,
}

impl Table {
    pub fn new(headers: &[&str], placeholder: &str) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            placeholder: placeholder.to_string(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// 表体：有数据时逐行输出，否则只有一行占位
    pub fn body_rows(&self) -> Vec<TableRow> {
        if self.rows.is_empty() {
            return vec![TableRow::Placeholder {
                text: self.placeholder.clone(),
                colspan: self.headers.len(),
            }];
        }
        self.rows.iter().cloned().map(TableRow::Cells).collect()
    }

    /// 纯文本输出（`|` 分隔，多行单元格压成一行）
    pub fn to_text(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(format!("| {} |", self.headers.join(" | ")));
        lines.push(format!(
            "|{}|",
            self.headers.iter().map(|_| "---").collect::<Vec<_>>().join("|")
        ));
        for row in self.body_rows() {
            match row {
                TableRow::Cells(cells) => {
                    let cells: Vec<String> = cells.iter().map(|c| flatten_cell(c)).collect();
                    lines.push(format!("| {} |", cells.join(" | ")));
                }
                TableRow::Placeholder { text, .. } => lines.push(format!("| {} |", text)),
            }
        }
        lines.join("\n")
    }
}

fn flatten_cell(cell: &str) -> String {
    cell.lines().map(str::trim).collect::<Vec<_>>().join(" ")
}
