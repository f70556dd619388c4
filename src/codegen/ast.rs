//! Statement tree for emitted source.

#[derive(Debug, Clone)]
pub enum Stmt {
    Blank,
    Line(String),
    Block {
        head: String,
        body: Vec<Stmt>,
        tail: String,
    },
}

impl Stmt {
    pub fn line(text: impl Into<String>) -> Self {
        Stmt::Line(text.into())
    }

    /// A braced block: `head` opens it, `}` closes it.
    pub fn block(head: impl Into<String>, body: Vec<Stmt>) -> Self {
        Stmt::Block {
            head: head.into(),
            body,
            tail: "}".to_string(),
        }
    }
}
