//! Renders a statement tree to source text.
use super::ast::Stmt;

const INDENT: &str = "    ";

pub fn render(stmts: &[Stmt]) -> String {
    let mut out = String::new();
    render_into(&mut out, stmts, 0);
    out
}

fn render_into(out: &mut String, stmts: &[Stmt], depth: usize) {
    for stmt in stmts {
        match stmt {
            Stmt::Blank => out.push('\n'),
            Stmt::Line(line) => {
                push_line(out, depth, line);
            }
            Stmt::Block { head, body, tail } => {
                push_line(out, depth, head);
                render_into(out, body, depth + 1);
                push_line(out, depth, tail);
            }
        }
    }
}

fn push_line(out: &mut String, depth: usize, text: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(text);
    out.push('\n');
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn nested_blocks_indent_by_depth() {
        let tree = vec![
            Stmt::line("fn main() {"),
            Stmt::block(
                "loop {",
                vec![
                    Stmt::line("step();"),
                    Stmt::block("if done {", vec![Stmt::line("break;")]),
                ],
            ),
        ];
        let rendered = render(&tree);
        assert_eq!(
            rendered,
            "fn main() {\nloop {\n    step();\n    if done {\n        break;\n    }\n}\n"
        );
    }

    #[test]
    fn blank_lines_carry_no_indent() {
        let tree = vec![Stmt::block(
            "mod a {",
            vec![Stmt::line("x();"), Stmt::Blank, Stmt::line("y();")],
        )];
        assert_eq!(render(&tree), "mod a {\n    x();\n\n    y();\n}\n");
    }
}
