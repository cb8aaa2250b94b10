//! LaTeX document wrapped around each formula.

/// Build the standalone LaTeX document for a formula.
///
/// The formula is inserted verbatim in display style and colored dark
/// gray so it blends with body text.
pub fn latex_document(formula: &str) -> String {
    let mut tex = String::new();
    tex.push_str("\\documentclass[10pt]{article}\n");
    tex.push_str("\\usepackage[utf8]{inputenc}\n");
    tex.push_str("\\usepackage{amsmath}\n");
    tex.push_str("\\usepackage{amssymb}\n");
    // dvipng --depth reads the baseline from preview's specials
    tex.push_str("\\usepackage[active,textmath]{preview}\n");
    tex.push_str("\\usepackage{xcolor}\n");

    // Times operators (sin, log, ...) to match the page font
    tex.push_str("\\SetSymbolFont{operators}{normal}{OT1}{ptm}{m}{n}\n");

    tex.push_str("\\newcommand{\\less}{<}\n");
    tex.push_str("\\newcommand{\\gtr}{>}\n");

    tex.push_str("\\pagestyle{empty}\n");
    tex.push_str("\\begin{document}\n");
    tex.push_str("$\\color{black!85}\\displaystyle{");
    tex.push_str(formula);
    tex.push_str("}$\n");
    tex.push_str("\\end{document}\n");
    tex
}
