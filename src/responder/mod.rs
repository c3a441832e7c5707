//! Offline reply engine.
//!
//! A message is first classified into an [`Intent`], then a reply is
//! formatted for the requested language and interpretation mode. Replies are
//! canned: this stands in for the real assistant when no backend is wired up.

pub mod terms;

use std::sync::LazyLock;

use regex::Regex;

use crate::i18n::{InterpretationMode, Language};
use terms::{clause_label, find_clause, lookup_term};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    /// `contract` is the text in front of the word "contract", if any.
    ArticleQuery { contract: Option<String>, clause: u32 },
    TermQuery { term: String },
    LongText,
    FreeText,
}

const KO_LONG_TEXT_CHARS: usize = 100;
const LONG_TEXT_CHARS: usize = 200;
const CONTRACT_KEYWORDS: &[&str] = &["계약서", "contract", "契約書", "合同", "contrato"];

static KO_GREETING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*안녕(하세요)?\s*[!.?~]*\s*$").expect("valid greeting pattern"));
static EN_GREETING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(hello|hi)\s*[!.?]*\s*$").expect("valid greeting pattern")
});
static JA_GREETING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*こんにちは\s*[!！。?？]*\s*$").expect("valid greeting pattern"));
static ZH_GREETING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*你好\s*[!！。?？]*\s*$").expect("valid greeting pattern"));
static ES_GREETING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*¡?\s*hola\s*[!.?]*\s*$").expect("valid greeting pattern")
});
static KO_ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"제?\s*(\d+)\s*조").expect("valid article pattern"));
static EN_ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)article\s*(\d+)").expect("valid article pattern"));
static CJK_ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"第\s*(\d+)\s*条").expect("valid article pattern"));
static ES_ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)art[ií]culo\s*(\d+)").expect("valid article pattern"));
static KO_TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(.+?)\s*(이란 무엇인가요|이란|란|에 대해 알려줘|설명해줘|means)\s*[?.!]*\s*$",
    )
    .expect("valid term pattern")
});
static EN_TERM_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(.+?)\s+(means|what is|explain|define)\s*[?.!]*\s*$")
        .expect("valid term pattern")
});
static EN_TERM_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:what is|what's|what are|define|explain)\s+(?:an?\s+|the\s+)?(.+?)\s*[?.!]*\s*$")
        .expect("valid term pattern")
});
static JA_TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(.+?)\s*(とは|の意味|意味|を教えて|教えて|を説明して|説明して)\s*[?？。!！]*\s*$")
        .expect("valid term pattern")
});
static ZH_TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(.+?)\s*(是什么意思|解释一下|的定义|定义)\s*[?？。!！]*\s*$")
        .expect("valid term pattern")
});
static ES_TERM_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(.+?)\s+(significa|qué es|explica|define)\s*[?.!]*\s*$")
        .expect("valid term pattern")
});
static ES_TERM_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*¿?\s*(?:qué es|que es|qué significa|que significa|define|explica)\s+(?:el\s+|la\s+|los\s+|las\s+|una?\s+)?(.+?)\s*[?.!]*\s*$",
    )
    .expect("valid term pattern")
});

pub fn classify(text: &str, language: Language) -> Intent {
    let (greeting, article) = match language {
        Language::Korean => (&*KO_GREETING, &*KO_ARTICLE),
        Language::English => (&*EN_GREETING, &*EN_ARTICLE),
        Language::Japanese => (&*JA_GREETING, &*CJK_ARTICLE),
        Language::Chinese => (&*ZH_GREETING, &*CJK_ARTICLE),
        Language::Spanish => (&*ES_GREETING, &*ES_ARTICLE),
    };

    if greeting.is_match(text) {
        return Intent::Greeting;
    }

    if let Some(captures) = article.captures(text)
        && let Some(whole) = captures.get(0)
        && let Some(clause) = captures.get(1).and_then(|m| m.as_str().parse().ok())
    {
        return Intent::ArticleQuery {
            contract: contract_name(&text[..whole.start()]),
            clause,
        };
    }

    if let Some(term) = term_query(text, language) {
        return Intent::TermQuery { term };
    }

    let limit = match language {
        Language::Korean => KO_LONG_TEXT_CHARS,
        _ => LONG_TEXT_CHARS,
    };
    if text.chars().count() > limit {
        return Intent::LongText;
    }

    Intent::FreeText
}

fn term_query(text: &str, language: Language) -> Option<String> {
    let captured = match language {
        Language::Korean => KO_TERM.captures(text),
        Language::English => EN_TERM_SUFFIX
            .captures(text)
            .or_else(|| EN_TERM_PREFIX.captures(text)),
        Language::Japanese => JA_TERM.captures(text),
        Language::Chinese => ZH_TERM.captures(text),
        Language::Spanish => ES_TERM_SUFFIX
            .captures(text)
            .or_else(|| ES_TERM_PREFIX.captures(text)),
    }?;

    let term = captured.get(1)?.as_str().trim();
    (!term.is_empty()).then(|| term.to_string())
}

/// The words in front of a contract keyword, or the keyword and the words
/// after it when nothing precedes it (`contrato laboral`).
fn contract_name(before_article: &str) -> Option<String> {
    let lower = before_article.to_lowercase();
    CONTRACT_KEYWORDS.iter().find_map(|keyword| {
        let index = lower.find(keyword)?;
        let name = lower[..index].trim();
        if !name.is_empty() {
            return Some(name.to_string());
        }
        let rest = lower[index + keyword.len()..].trim();
        (!rest.is_empty()).then(|| lower[index..].trim().to_string())
    })
}

/// Builds canned replies for one interpretation mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockResponder {
    pub mode: InterpretationMode,
}

impl MockResponder {
    pub fn new(mode: InterpretationMode) -> Self {
        Self { mode }
    }

    pub fn reply(&self, text: &str, language: Language) -> String {
        let intent = classify(text, language);
        tracing::debug!("Classified message as {:?}", intent);
        self.format(&intent, text, language)
    }

    pub fn format(&self, intent: &Intent, text: &str, language: Language) -> String {
        let easy = self.mode == InterpretationMode::Easy;
        let prefix = if easy { easy_prefix(language) } else { "" };

        match intent {
            Intent::Greeting => general_reply(language, text),
            Intent::ArticleQuery { contract, clause } => {
                let label = clause_label(language, *clause);
                let found = contract
                    .as_deref()
                    .and_then(|name| find_clause(language, name, *clause));
                match found {
                    Some(found) => {
                        let body =
                            clause_reply(language, &format!("{} {}", found.contract, label), found.text);
                        if easy {
                            format!("{}{}{}", prefix, body, easy_clause_note(language))
                        } else {
                            body
                        }
                    }
                    None => {
                        let contract = contract
                            .clone()
                            .unwrap_or_else(|| unknown_document(language).to_string());
                        clause_not_found(language, &contract, &label)
                    }
                }
            }
            Intent::TermQuery { term } => match lookup_term(term) {
                Some(entry) => {
                    let name = entry.term(language);
                    let explanation = entry.explanation(language);
                    if easy {
                        format!(
                            "{}{}{}{} ({}: {})",
                            prefix,
                            name,
                            term_connective(language),
                            easy_term_explanation(language, name),
                            original_label(language),
                            explanation
                        )
                    } else {
                        format!("{}{}{}", name, term_connective(language), explanation)
                    }
                }
                None => format!("{}{}", prefix, general_reply(language, text)),
            },
            Intent::LongText => long_text_reply(language).to_string(),
            Intent::FreeText if easy => format!("{}{}", prefix, easy_reply(language, text)),
            Intent::FreeText => default_reply(language, text),
        }
    }
}

fn easy_prefix(language: Language) -> &'static str {
    match language {
        Language::Korean => "쉽게 설명드리자면, ",
        Language::English => "To put it simply, ",
        Language::Japanese => "簡単に言いますと、",
        Language::Chinese => "简单来说，",
        Language::Spanish => "En pocas palabras, ",
    }
}

fn general_reply(language: Language, input: &str) -> String {
    match language {
        Language::Korean => format!(
            "\"{}\"에 대해 설명드리겠습니다. 이 내용은 다음과 같이 이해할 수 있습니다. 구체적인 계약서명과 조항을 알려주시면 더 자세히 설명드릴 수 있습니다. (예: 근로계약서 제1조)",
            input
        ),
        Language::English => format!(
            "Regarding \"{}\", here's an explanation: This content can be understood as follows... For more details, please specify the contract name and article number (e.g., Labor Contract Article 1).",
            input
        ),
        Language::Japanese => format!(
            "「{}」についてご説明します。この内容は次のように理解できます。詳細については、契約書名と条項番号を指定してください（例：労働契約書 第1条）。",
            input
        ),
        Language::Chinese => format!(
            "关于 \"{}\"，解释如下：此内容可理解为... 如需更多详细信息，请指明合同名称和条款编号（例如：劳动合同 第1条）。",
            input
        ),
        Language::Spanish => format!(
            "Con respecto a \"{}\", aquí hay una explicación: Este contenido se puede entender de la siguiente manera... Para más detalles, especifique el nombre del contrato y el número de artículo (por ejemplo, Contrato Laboral Artículo 1).",
            input
        ),
    }
}

fn easy_reply(language: Language, input: &str) -> String {
    match language {
        Language::Korean => format!(
            "\"{}\"에 대한 아주 쉬운 설명입니다! 예를 들어 어린아이에게 설명하듯이 말하자면... (이해를 돕기 위해 비유를 사용합니다.)",
            input
        ),
        Language::English => format!(
            "Here's a very simple explanation for \"{}\"! For example, if I were to explain it to a child... (Uses analogies for better understanding.)",
            input
        ),
        Language::Japanese => format!(
            "「{}」についての非常に簡単な説明です！例えば子供に説明するように言うと...（理解を助けるために例え話を使います。）",
            input
        ),
        Language::Chinese => format!(
            "这是关于 \"{}\" 的一个非常简单的解释！例如，如果我要向孩子解释...（使用类比以更好地理解。）",
            input
        ),
        Language::Spanish => format!(
            "¡Aquí hay una explicación muy simple para \"{}\"! Por ejemplo, si tuviera que explicárselo a un niño... (Usa analogías para una mejor comprensión.)",
            input
        ),
    }
}

fn default_reply(language: Language, input: &str) -> String {
    match language {
        Language::Korean => format!(
            "\"{}\"에 대한 기본 설명입니다. 원문의 의미를 최대한 살리면서, 필요한 경우 법률 용어에 대한 부가 설명을 제공합니다.",
            input
        ),
        Language::English => format!(
            "Here's the default explanation for \"{}\". It preserves the original meaning as much as possible, providing additional explanations for legal terms if necessary.",
            input
        ),
        Language::Japanese => format!(
            "「{}」についての基本説明です。原文の意味を最大限に活かし、必要に応じて法律用語の補足説明を提供します。",
            input
        ),
        Language::Chinese => format!(
            "这是关于 \"{}\" 的默认解释。它尽可能保留原始含义，并在必要时为法律术语提供额外解释。",
            input
        ),
        Language::Spanish => format!(
            "Aquí está la explicación predeterminada para \"{}\". Conserva el significado original tanto como sea posible, proporcionando explicaciones adicionales para los términos legales si es necesario.",
            input
        ),
    }
}

fn clause_reply(language: Language, title: &str, content: &str) -> String {
    match language {
        Language::Korean => format!("📜 {}의 내용은 다음과 같습니다:\n\"{}\"", title, content),
        Language::English => format!("📜 The content of {} is as follows:\n\"{}\"", title, content),
        Language::Japanese => format!("📜 {}の内容は以下の通りです：\n「{}」", title, content),
        Language::Chinese => format!("📜 {} 的内容如下：\n\"{}\"", title, content),
        Language::Spanish => {
            format!("📜 El contenido de {} es el siguiente:\n\"{}\"", title, content)
        }
    }
}

fn easy_clause_note(language: Language) -> &'static str {
    match language {
        Language::Korean => " (쉬운 설명 추가 필요)",
        Language::English => " (a plain-language explanation will follow)",
        Language::Japanese => "（わかりやすい説明は追って追加します）",
        Language::Chinese => "（通俗解释稍后补充）",
        Language::Spanish => " (se añadirá una explicación sencilla)",
    }
}

fn clause_not_found(language: Language, contract: &str, clause: &str) -> String {
    match language {
        Language::Korean => format!(
            "죄송합니다. {}에서 {}을 찾을 수 없거나, 해당 계약서 정보가 아직 준비되지 않았습니다.",
            contract, clause
        ),
        Language::English => format!(
            "Sorry, I couldn't find {} in {}, or the information for this contract is not yet available.",
            clause, contract
        ),
        Language::Japanese => format!(
            "申し訳ありませんが、{}の{}が見つからないか、この契約書の情報はまだ利用できません。",
            contract, clause
        ),
        Language::Chinese => format!(
            "抱歉，我在 {} 中找不到 {}，或者此合同的信息尚不可用。",
            contract, clause
        ),
        Language::Spanish => format!(
            "Lo siento, no pude encontrar {} en {}, o la información para este contrato aún no está disponible.",
            clause, contract
        ),
    }
}

fn unknown_document(language: Language) -> &'static str {
    match language {
        Language::Korean => "해당 문서",
        Language::English => "the document",
        Language::Japanese => "該当文書",
        Language::Chinese => "该文件",
        Language::Spanish => "el documento",
    }
}

fn term_connective(language: Language) -> &'static str {
    match language {
        Language::Korean => "은(는) ",
        Language::English => " means ",
        Language::Japanese => "とは、",
        Language::Chinese => "是指",
        Language::Spanish => " significa ",
    }
}

fn easy_term_explanation(language: Language, term: &str) -> String {
    match language {
        Language::Korean => format!("쉽게 말해 이럴 때 쓰는 말이에요. {}", term),
        Language::English => format!("in simple terms, {} is like when...", term),
        Language::Japanese => format!("簡単に言うと、{}はこういう時に使う言葉です...", term),
        Language::Chinese => format!("简单来说，{}就像是当...", term),
        Language::Spanish => format!("en términos simples, {} es como cuando...", term),
    }
}

fn original_label(language: Language) -> &'static str {
    match language {
        Language::Korean => "원래 설명",
        Language::English => "original explanation",
        Language::Japanese => "元の説明",
        Language::Chinese => "原始解释",
        Language::Spanish => "explicación original",
    }
}

fn long_text_reply(language: Language) -> &'static str {
    match language {
        Language::Korean => {
            "입력하신 내용이 깁니다. 계약서로 보입니다. 어떤 부분이 궁금하신가요? (예: 제3조 내용, 위험 요소)"
        }
        Language::English => {
            "The text you entered is quite long. It seems to be a contract. What specific part are you curious about? (e.g., Article 3 content, risk factors)"
        }
        Language::Japanese => {
            "入力された内容が長文です。契約書のようです。どの部分についてお知りになりたいですか？ (例: 第3条の内容, リスク要因)"
        }
        Language::Chinese => {
            "您输入的文本很长。它似乎是一份合同。您对哪个具体部分感兴趣？（例如：第3条内容，风险因素）"
        }
        Language::Spanish => {
            "El texto que ingresó es bastante largo. Parece ser un contrato. ¿Sobre qué parte específica tiene curiosidad? (por ejemplo, contenido del Artículo 3, factores de riesgo)"
        }
    }
}
