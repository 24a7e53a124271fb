//! Documentation policy sent as system instructions.
//!
//! One template for every documentation language; only the phrase table
//! differs, so the English and Russian policies cannot drift apart.

use crate::models::DocLanguage;

/// Language-specific wording plugged into [`POLICY_TEMPLATE`].
struct PolicyPhrases {
    comment_language: &'static str,
    description_example: &'static str,
    param_example: &'static str,
    returns_example: &'static str,
    module_example: &'static str,
    entrypoint_example: &'static str,
}

const ENGLISH: PolicyPhrases = PolicyPhrases {
    comment_language: "English",
    description_example: "Loads the configuration file and merges it with the defaults.",
    param_example: "Path to the configuration file.",
    returns_example: "The merged configuration as a JSON string.",
    module_example: "config/loader",
    entrypoint_example: "no (called by bootstrap())",
};

const RUSSIAN: PolicyPhrases = PolicyPhrases {
    comment_language: "Russian",
    description_example: "Загружает файл конфигурации и объединяет его со значениями по умолчанию.",
    param_example: "Путь к файлу конфигурации.",
    returns_example: "Объединённая конфигурация в виде строки JSON.",
    module_example: "config/loader",
    entrypoint_example: "нет (вызывается из bootstrap())",
};

const POLICY_TEMPLATE: &str = "\
You are a senior %LANGUAGE% engineer documenting an existing codebase.
Insert documentation comments into the file supplied by the user, following this policy exactly.

1. Every function, method and class gets a block comment placed immediately above its definition, \
using the native documentation syntax of %LANGUAGE% (/** ... */ blocks for JavaScript, TypeScript \
and Google Apps Script, docstrings for Python, Javadoc for Java, // comments for Go).
2. Each block contains, in this order:
   - a description of one or two sentences saying what the code does;
   - one @param line per parameter: @param {type} name - meaning;
   - an @returns line: @returns {type} meaning (use @returns {void} when nothing is returned);
   - an @module line naming the module the file belongs to;
   - an @entrypoint line stating whether this is an entry point of the project and who calls it.
   All five fields are mandatory.
3. Write all comment text in %COMMENT_LANGUAGE%. Keep the tag names in English.
4. Do not change, reorder, reformat or remove any existing code or comments. Only add comments.
5. If the file contains no functions or classes, return it unchanged.
6. Respond with the complete file content only, without explanations and without markdown fences.

Example:
/**
 * %DESCRIPTION%
 * @param {string} path - %PARAM%
 * @returns {string} %RETURNS%
 * @module %MODULE%
 * @entrypoint %ENTRYPOINT%
 */";

fn phrases(doc_language: DocLanguage) -> &'static PolicyPhrases {
    match doc_language {
        DocLanguage::English => &ENGLISH,
        DocLanguage::Russian => &RUSSIAN,
    }
}

/// Policy text for a file in `language`, commented in `doc_language`.
pub fn policy_text(doc_language: DocLanguage, language: &str) -> String {
    let p = phrases(doc_language);
    POLICY_TEMPLATE
        .replace("%LANGUAGE%", language)
        .replace("%COMMENT_LANGUAGE%", p.comment_language)
        .replace("%DESCRIPTION%", p.description_example)
        .replace("%PARAM%", p.param_example)
        .replace("%RETURNS%", p.returns_example)
        .replace("%MODULE%", p.module_example)
        .replace("%ENTRYPOINT%", p.entrypoint_example)
}

/// Full system instruction: policy followed by the shared project context.
pub fn system_instruction(
    doc_language: DocLanguage,
    language: &str,
    project_context: &str,
) -> String {
    format!(
        "{}\n\nThe file is written in {language}.\n\n{}",
        policy_text(doc_language, language),
        project_context.trim_end()
    )
}
