//! Sufficient techniques for WCAG 2.4.4 (Link Purpose, In Context).

use linkpurpose_scanner::LinkRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Technique {
    pub id: &'static str,
    pub title_ja: &'static str,
    pub title_en: &'static str,
}

pub const TECHNIQUES: [Technique; 14] = [
    Technique {
        id: "G91",
        title_ja: "リンクの目的を説明したリンクテキストを提供する",
        title_en: "Providing link text that describes the purpose of a link",
    },
    Technique {
        id: "H30",
        title_ja: "a要素のリンクの目的を説明するリンクテキストを提供する",
        title_en: "Providing link text that describes the purpose of a link for anchor elements",
    },
    Technique {
        id: "H24",
        title_ja: "イメージマップのarea要素にテキストによる代替を提供する",
        title_en: "Providing text alternatives for the area elements of image maps",
    },
    Technique {
        id: "G189",
        title_ja: "リンクテキストを変更するコントロールを提供する",
        title_en: "Providing a control near the beginning of the Web page that changes the link text",
    },
    Technique {
        id: "SCR30",
        title_ja: "リンクテキストを変更するためにスクリプトを使用する",
        title_en: "Using scripts to change the link text",
    },
    Technique {
        id: "G53",
        title_ja: "リンクテキストとそれが含まれている文中のテキストとを組み合わせて、リンクの目的を特定する",
        title_en: "Identifying the purpose of a link using link text combined with the text of the enclosing sentence",
    },
    Technique {
        id: "H33",
        title_ja: "title属性を用いて、リンクテキストを補足する",
        title_en: "Supplementing link text with the title attribute",
    },
    Technique {
        id: "C7",
        title_ja: "リンクテキストの一部を非表示にするためにCSSを使用する",
        title_en: "Using CSS to hide a portion of the link text",
    },
    Technique {
        id: "ARIA7",
        title_ja: "リンクの目的を示すためにaria-labelledbyを使用する",
        title_en: "Using aria-labelledby for link purpose",
    },
    Technique {
        id: "ARIA8",
        title_ja: "リンクの目的を示すためにaria-labelを使用する",
        title_en: "Using aria-label for link purpose",
    },
    Technique {
        id: "H77",
        title_ja: "リンクテキストとそれが含まれているリスト項目とを組み合わせて、リンクの目的を特定する",
        title_en: "Identifying the purpose of a link using link text combined with its enclosing list item",
    },
    Technique {
        id: "H78",
        title_ja: "リンクテキストとそれが含まれている段落とを組み合わせて、リンクの目的を特定する",
        title_en: "Identifying the purpose of a link using link text combined with its enclosing paragraph",
    },
    Technique {
        id: "H79",
        title_ja: "リンクテキストとそれが含まれているデータセル及び関連づけられた見出しセルとを組み合わせて、リンクの目的を特定する",
        title_en: "Identifying the purpose of a link in a data table using the link text combined with its enclosing table cell and associated table header cells",
    },
    Technique {
        id: "H81",
        title_ja: "入れ子になったリストの中でリンクの目的を特定する",
        title_en: "Identifying the purpose of a link in a nested list using link text combined with the parent list item under which the list is nested",
    },
];

pub fn find(id: &str) -> Option<&'static Technique> {
    TECHNIQUES.iter().find(|t| t.id.eq_ignore_ascii_case(id))
}

/// The identifier part of a cited technique. The model usually answers
/// with `"G91: description"`, sometimes with a full-width colon or just the id.
pub fn technique_id(entry: &str) -> &str {
    entry
        .trim()
        .split([':', '：', ' ', '\u{3000}'])
        .next()
        .unwrap_or_default()
}

pub fn is_known(entry: &str) -> bool {
    find(technique_id(entry)).is_some()
}

/// Cited techniques on a judged record that are not in the catalog.
pub fn unknown_techniques(record: &LinkRecord) -> Vec<String> {
    record
        .analysis
        .iter()
        .flat_map(|analysis| analysis.success_techniques.iter())
        .filter(|entry| !is_known(entry))
        .cloned()
        .collect()
}
