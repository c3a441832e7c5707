use crate::i18n::Language;

/// One string per supported language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Localized {
    pub ko: &'static str,
    pub en: &'static str,
    pub ja: &'static str,
    pub zh: &'static str,
    pub es: &'static str,
}

impl Localized {
    pub fn get(&self, language: Language) -> &'static str {
        match language {
            Language::Korean => self.ko,
            Language::English => self.en,
            Language::Japanese => self.ja,
            Language::Chinese => self.zh,
            Language::Spanish => self.es,
        }
    }
}

/// A dictionary entry rendered in every reply language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegalTerm {
    /// Lowercase spellings a user may ask about, in any language.
    pub keys: &'static [&'static str],
    pub term: Localized,
    pub explanation: Localized,
}

impl LegalTerm {
    pub fn term(&self, language: Language) -> &'static str {
        self.term.get(language)
    }

    pub fn explanation(&self, language: Language) -> &'static str {
        self.explanation.get(language)
    }
}

pub const LEGAL_TERMS: &[LegalTerm] = &[
    LegalTerm {
        keys: &["계약", "contract", "契約", "合同", "contrato"],
        term: Localized {
            ko: "계약",
            en: "Contract",
            ja: "契約 (けいやく)",
            zh: "合同",
            es: "Contrato",
        },
        explanation: Localized {
            ko: "둘 이상의 당사자 간의 법적 효력이 있는 합의",
            en: "A legally binding agreement between two or more parties.",
            ja: "二人以上の当事者間の法的な合意。",
            zh: "两方或多方之间具有法律约束力的协议。",
            es: "Un acuerdo legalmente vinculante entre dos o más partes.",
        },
    },
    LegalTerm {
        keys: &[
            "특약",
            "special condition",
            "rider",
            "special condition/rider",
            "特約",
            "特别条款",
            "cláusula especial",
        ],
        term: Localized {
            ko: "특약",
            en: "Special Condition/Rider",
            ja: "特約 (とくやく)",
            zh: "特别条款",
            es: "Cláusula Especial",
        },
        explanation: Localized {
            ko: "계약 당사자가 본계약 외에 추가로 합의한 특별한 약속",
            en: "An additional term agreed upon by parties beyond the main contract.",
            ja: "契約当事者が本契約以外に追加で合意した特別な約束。",
            zh: "合同当事人在主合同之外另行约定的特殊条款。",
            es: "Un término adicional acordado por las partes más allá del contrato principal.",
        },
    },
    LegalTerm {
        keys: &["갑", "갑 (甲)", "party a", "甲", "甲方", "parte a"],
        term: Localized {
            ko: "갑 (甲)",
            en: "Party A",
            ja: "甲 (こう)",
            zh: "甲方",
            es: "Parte A",
        },
        explanation: Localized {
            ko: "계약에서 주로 권리자나 발주자 등 첫 번째 당사자를 지칭",
            en: "Typically refers to the first party in a contract, often the principal or client.",
            ja: "契約において、主に権利者や発注者など第一の当事者を指す。",
            zh: "合同中通常指权利人或发包方等第一方当事人。",
            es: "Generalmente se refiere a la primera parte en un contrato, a menudo el principal o cliente.",
        },
    },
    LegalTerm {
        keys: &["을", "을 (乙)", "party b", "乙", "乙方", "parte b"],
        term: Localized {
            ko: "을 (乙)",
            en: "Party B",
            ja: "乙 (おつ)",
            zh: "乙方",
            es: "Parte B",
        },
        explanation: Localized {
            ko: "계약에서 주로 의무자나 수주자 등 두 번째 당사자를 지칭",
            en: "Typically refers to the second party in a contract, often the agent or contractor.",
            ja: "契約において、主に義務者や受注者など第二の当事者を指す。",
            zh: "合同中通常指义务人或承包方等第二方当事人。",
            es: "Generalmente se refiere a la segunda parte en un contrato, a menudo el agente o contratista.",
        },
    },
    LegalTerm {
        keys: &[
            "손해배상",
            "damages",
            "compensation for damages",
            "損害賠償",
            "损害赔偿",
            "indemnización por daños y perjuicios",
            "indemnización",
        ],
        term: Localized {
            ko: "손해배상",
            en: "Damages",
            ja: "損害賠償 (そんがいばいしょう)",
            zh: "损害赔偿",
            es: "Indemnización por Daños y Perjuicios",
        },
        explanation: Localized {
            ko: "위법행위로 타인에게 입힌 손해를 돈으로 물어주는 것",
            en: "Monetary compensation for loss or injury caused by a wrongful act.",
            ja: "違法行為により他人に与えた損害を金銭で補償すること。",
            zh: "因违法行为给他人造成的损失用金钱进行赔偿。",
            es: "Compensación monetaria por pérdidas o lesiones causadas por un acto ilícito.",
        },
    },
    LegalTerm {
        keys: &[
            "보증금",
            "security deposit",
            "deposit",
            "敷金",
            "保証金",
            "保证金",
            "depósito de garantía",
            "depósito",
        ],
        term: Localized {
            ko: "보증금",
            en: "Security Deposit",
            ja: "敷金 (しききん)",
            zh: "保证金",
            es: "Depósito de Garantía",
        },
        explanation: Localized {
            ko: "임대차 계약 시 임차인이 임대인에게 지급하는 일정 금액 (채무 담보 목적)",
            en: "Money paid to a landlord to cover potential damages.",
            ja: "賃貸借契約時に賃借人が賃貸人に預ける金銭。",
            zh: "租赁合同时，承租人向出租人支付的一定金额（用于债务担保）。",
            es: "Dinero que el inquilino entrega al arrendador al inicio del contrato de alquiler para cubrir posibles daños o incumplimientos.",
        },
    },
    LegalTerm {
        keys: &[
            "지식재산권",
            "intellectual property rights",
            "intellectual property",
            "知的財産権",
            "知识产权",
            "derechos de propiedad intelectual",
            "propiedad intelectual",
        ],
        term: Localized {
            ko: "지식재산권",
            en: "Intellectual Property Rights",
            ja: "知的財産権 (ちてきざいさんけん)",
            zh: "知识产权",
            es: "Derechos de Propiedad Intelectual",
        },
        explanation: Localized {
            ko: "발명, 상표, 디자인 등 지적 창작물에 대한 권리",
            en: "Rights to creations of the mind, such as inventions, literary and artistic works.",
            ja: "発明、著作物など人間の知的創造活動によって生み出されたものに対する権利。",
            zh: "对发明、商标、设计等智力创作成果的权利。",
            es: "Derechos sobre las creaciones de la mente, como invenciones, obras literarias y artísticas.",
        },
    },
];

pub fn lookup_term(query: &str) -> Option<&'static LegalTerm> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }
    LEGAL_TERMS
        .iter()
        .find(|term| term.keys.iter().any(|key| *key == query))
}

/// Sample contract clauses for the offline responder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockClause {
    pub language: Language,
    pub contract: &'static str,
    pub number: u32,
    pub text: &'static str,
}

const fn clause(
    language: Language,
    contract: &'static str,
    number: u32,
    text: &'static str,
) -> MockClause {
    MockClause {
        language,
        contract,
        number,
        text,
    }
}

pub const MOCK_CLAUSES: &[MockClause] = &[
    clause(Language::Korean, "근로계약서", 1, "이 계약은..."),
    clause(Language::Korean, "근로계약서", 3, "근로시간은 주 40시간으로 한다."),
    clause(Language::Korean, "임대차계약서", 5, "임차인은 임대료를 매월 말일에 지급한다."),
    clause(Language::English, "labor contract", 1, "This contract is..."),
    clause(Language::English, "labor contract", 3, "Working hours are 40 hours per week."),
    clause(Language::Japanese, "労働契約書", 1, "この契約は..."),
    clause(Language::Japanese, "労働契約書", 3, "労働時間は週40時間とする。"),
    clause(Language::Chinese, "劳动合同", 1, "本合同是..."),
    clause(Language::Chinese, "劳动合同", 3, "工作时间为每周40小时。"),
    clause(Language::Spanish, "contrato laboral", 1, "Este contrato es..."),
    clause(
        Language::Spanish,
        "contrato laboral",
        3,
        "Las horas de trabajo son 40 horas por semana.",
    ),
];

/// Contract names match loosely: either may contain the other.
pub fn find_clause(
    language: Language,
    contract: &str,
    number: u32,
) -> Option<&'static MockClause> {
    let wanted = contract.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    MOCK_CLAUSES.iter().find(|clause| {
        let name = clause.contract.to_lowercase();
        clause.language == language
            && clause.number == number
            && (name.contains(&wanted) || wanted.contains(&name))
    })
}

/// How a clause number is written, e.g. `3조`, `article 3` or `第3条`.
pub fn clause_label(language: Language, number: u32) -> String {
    match language {
        Language::Korean => format!("{}조", number),
        Language::English => format!("article {}", number),
        Language::Japanese | Language::Chinese => format!("第{}条", number),
        Language::Spanish => format!("artículo {}", number),
    }
}
