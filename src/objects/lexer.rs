use std::slice::Iter;

/// One directive of an OBJ or MTL line.
///
/// Arguments borrow from the line they were read from.
#[derive(Debug, PartialEq)]
pub enum Token<'a> {
    Group(&'a str),
    Vertice(Vec<&'a str>),
    Face(Vec<&'a str>),
    UseMaterial(&'a str),
    NewMaterial(&'a str),
    Diffuse(Vec<&'a str>),
    Other(&'a str),
}

#[derive(Debug, PartialEq)]
pub struct Line<'a> {
    /// 1-based line number in the source file.
    pub row: usize,
    pub token: Token<'a>,
}

/// Walks pre-loaded lines and yields one token per meaningful line.
///
/// Lines with fewer than two whitespace-separated words carry no directive
/// and are skipped, so blank lines and a bare `o` never reach the caller.
pub struct Lexer<'a> {
    lines: Iter<'a, String>,
    row: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(lines: &'a [String]) -> Self {
        return Lexer {
            lines: lines.iter(),
            row: 0,
        };
    }

    fn tokenize(line: &'a str) -> Option<Token<'a>> {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() < 2 {
            return None;
        }

        let token = match words[0] {
            "o" | "g" => Token::Group(words[1]),
            "v" => Token::Vertice(words[1..].to_vec()),
            "f" => Token::Face(words[1..].to_vec()),
            "usemtl" => Token::UseMaterial(words[1]),
            "newmtl" => Token::NewMaterial(words[1]),
            "Kd" => Token::Diffuse(words[1..].to_vec()),
            keyword => Token::Other(keyword),
        };

        return Some(token);
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Line<'a>> {
        for line in self.lines.by_ref() {
            self.row += 1;

            if let Some(token) = Lexer::tokenize(line) {
                return Some(Line {
                    row: self.row,
                    token,
                });
            }
        }

        return None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        return text.lines().map(String::from).collect();
    }

    #[test]
    fn skips_short_lines_and_counts_rows() {
        let source = lines("o\n\nv 1 2 3\n# \ng body");
        let tokens: Vec<Line> = Lexer::new(&source).collect();

        assert_eq!(
            tokens,
            vec![
                Line {
                    row: 3,
                    token: Token::Vertice(vec!["1", "2", "3"]),
                },
                Line {
                    row: 5,
                    token: Token::Group("body"),
                },
            ]
        );
    }

    #[test]
    fn group_keyword_must_match_exactly() {
        let source = lines("og name\nobject name\no name");
        let tokens: Vec<Token> = Lexer::new(&source).map(|line| line.token).collect();

        assert_eq!(
            tokens,
            vec![
                Token::Other("og"),
                Token::Other("object"),
                Token::Group("name"),
            ]
        );
    }

    #[test]
    fn recognizes_material_directives() {
        let source = lines("newmtl red\n  Kd 1 0 0\nusemtl red\nNs 10");
        let tokens: Vec<Token> = Lexer::new(&source).map(|line| line.token).collect();

        assert_eq!(
            tokens,
            vec![
                Token::NewMaterial("red"),
                Token::Diffuse(vec!["1", "0", "0"]),
                Token::UseMaterial("red"),
                Token::Other("Ns"),
            ]
        );
    }
}
