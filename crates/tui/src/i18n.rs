//! Bilingual (English/Arabic) string table for everything user-facing.
//!
//! Lookups fall back to the key itself, so a missing entry shows up on
//! screen as the key instead of crashing or blanking a label.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    En,
    Ar,
}

impl Lang {
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Self::En),
            "ar" => Some(Self::Ar),
            _ => None,
        }
    }

    /// Locale inference from `LC_ALL`/`LANG`, the terminal counterpart of
    /// checking the browser language.
    pub fn from_env() -> Self {
        let locale = std::env::var("LC_ALL")
            .or_else(|_| std::env::var("LANG"))
            .unwrap_or_default();
        Self::from_locale(&locale)
    }

    pub fn from_locale(locale: &str) -> Self {
        if locale.starts_with("ar") {
            Self::Ar
        } else {
            Self::En
        }
    }

    pub fn is_rtl(self) -> bool {
        matches!(self, Self::Ar)
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::En => Self::Ar,
            Self::Ar => Self::En,
        }
    }
}

/// Looks up `key` for `lang`; unknown keys come back verbatim.
pub fn tr<'a>(lang: Lang, key: &'a str) -> &'a str {
    match TABLE.iter().find(|(name, _, _)| *name == key) {
        Some((_, en, ar)) => match lang {
            Lang::En => en,
            Lang::Ar => ar,
        },
        None => key,
    }
}

const TABLE: &[(&str, &str, &str)] = &[
    ("appTitle", "Budget Office", "مكتب الميزانية"),
    ("overview", "Overview", "نظرة عامة"),
    ("recentActivity", "Recent Activity", "النشاط الأخير"),
    ("manageRules", "Manage Rules", "إدارة التصنيفات"),
    ("loading", "Loading...", "جاري التحميل..."),
    ("cancel", "Cancel", "إلغاء"),
    ("edit", "Edit", "تعديل"),
    ("update", "Update", "تحديث"),
    ("delete", "Delete", "حذف"),
    ("yes", "Yes", "نعم"),
    ("no", "No", "لا"),
    ("refresh", "refresh", "تحديث"),
    ("help", "help", "مساعدة"),
    ("quit", "quit", "خروج"),
    ("close", "close", "إغلاق"),
    ("nav", "nav", "تنقل"),
    ("nextField", "next field", "الحقل التالي"),
    ("analysis", "analysis", "تحليل"),
    ("loadFailed", "Failed to load", "فشل التحميل"),
    // Shows the language you would switch to, not the current one.
    ("languageToggle", "العربية", "English"),
    // Dashboard
    ("setupBudget", "Setup your budget", "إعداد الميزانية"),
    (
        "setupBudgetDesc",
        "Add classification rules to start tracking category limits.",
        "أضف قواعد التصنيف للبدء في تتبع حدود الفئات.",
    ),
    ("spent", "Spent", "المصروف"),
    ("limit", "Limit", "الحد"),
    ("left", "left", "متبقي"),
    ("noLimit", "No limit set", "لا يوجد حد"),
    ("newExpense", "New Expense", "نفقات جديدة"),
    (
        "pasteSMS",
        "Paste SMS here... e.g. Purchase of SAR 150.00 at XYZ Store...",
        "الصق الرسالة النصية هنا... مثال: تم الشراء بمبلغ 150.00 ريال...",
    ),
    ("processSMS", "Process SMS", "معالجة الرسالة"),
    ("success", "Processed successfully", "تمت المعالجة بنجاح"),
    ("error", "Failed to process", "فشلت المعالجة"),
    ("noExpenses", "No expenses yet", "لا توجد نفقات بعد"),
    ("startPrompt", "Paste an SMS to get started", "الصق رسالة نصية للبدء"),
    ("unknownMerchant", "Unknown Merchant", "تاجر غير معروف"),
    ("proTip", "Pro Tip", "نصيحة"),
    (
        "proTipDesc",
        "Copy the entire SMS message from your bank and paste it directly. The system will automatically extract the merchant, amount, and date.",
        "انسخ رسالة البنك النصية بالكامل والصقها مباشرة. سيقوم النظام باستخراج اسم التاجر والمبلغ والتاريخ تلقائياً.",
    ),
    // Rules page
    ("rulesTitle", "Manage Rules & Budgets", "إدارة التصنيفات والميزانيات"),
    ("addRule", "Add Rule", "إضافة تصنيف"),
    ("merchantLabel", "Merchant Keyword", "كلمات مفتاحية للتاجر"),
    ("merchantPlaceholder", "Type keyword and press Enter...", "اكتب الكلمة واضغط Enter..."),
    (
        "merchantHint",
        "Enter or comma adds. ←/→ picks a keyword, Backspace removes it.",
        "اضغط Enter أو فاصلة للإضافة. الأسهم لاختيار كلمة وBackspace لحذفها.",
    ),
    ("categoryLabel", "Main Category", "الفئة الرئيسية"),
    ("categoryPlaceholder", "e.g. Transport", "مثال: مواصلات"),
    ("limitLabel", "Monthly Limit (SAR)", "الحد الشهري (ريال)"),
    ("limitPlaceholder", "Optional", "اختياري"),
    ("saveRule", "Save Rule", "حفظ التصنيف"),
    ("colPattern", "Pattern", "الكلمة المفتاحية"),
    ("colCategory", "Category", "الفئة"),
    ("colLimit", "Limit", "الحد"),
    ("confirmDelete", "Are you sure?", "هل أنت متأكد؟"),
    (
        "confirmDeleteInvoice",
        "Are you sure you want to delete this invoice?",
        "هل أنت متأكد من حذف هذه الفاتورة؟",
    ),
    ("noRules", "No rules defined", "لا توجد تصانيف معرفة"),
    ("editRule", "Edit Rule", "تعديل التصنيف"),
    ("editInvoice", "Edit Invoice", "تعديل النفقة"),
    ("selectCategory", "Select category", "اختر الفئة"),
    ("subCategoryLabel", "Sub Category", "الفئة الفرعية"),
    ("subCategoryPlaceholder", "e.g. Ride-sharing", "مثال: توصيل"),
    ("classificationLabel", "Classification", "التصنيف"),
    ("classificationPlaceholder", "e.g. Expense", "مثال: مصروف"),
    ("merchantRequired", "Add at least one keyword", "أضف كلمة مفتاحية واحدة على الأقل"),
    ("categoryRequired", "Main category is required", "الفئة الرئيسية مطلوبة"),
    ("invalidLimit", "Invalid limit amount", "قيمة الحد غير صالحة"),
    ("ruleSaved", "Rule saved", "تم حفظ التصنيف"),
    ("ruleDeleted", "Rule deleted", "تم حذف التصنيف"),
    ("invoiceUpdated", "Invoice updated", "تم تحديث الفاتورة"),
    ("invoiceDeleted", "Invoice deleted", "تم حذف الفاتورة"),
    // Budget cycle
    ("cycleTitle", "Budget Cycle", "دورة الميزانية"),
    ("noCycle", "No active budget cycle", "لا توجد دورة ميزانية نشطة"),
    ("startCycle", "Start New Cycle", "بدء دورة جديدة"),
    ("daysRemaining", "Days Left", "يوم متبقي"),
    ("daysElapsed", "Days In", "يوم منقضي"),
    ("startedOn", "Started", "بدأت"),
    ("history", "History", "السجل"),
    ("startNow", "Start Now", "ابدأ الآن"),
    ("customDate", "Or choose a custom start date", "أو اختر تاريخ بدء مخصص"),
    ("selectDate", "Select start date", "اختر تاريخ البدء"),
    ("start", "Start with this date", "ابدأ بهذا التاريخ"),
    ("newCycle", "New Budget Cycle", "دورة ميزانية جديدة"),
    ("active", "Active", "نشطة"),
    ("closed", "Closed", "مغلقة"),
    ("invalidDate", "Use YYYY-MM-DD", "استخدم الصيغة YYYY-MM-DD"),
    ("futureDate", "Date cannot be in the future", "لا يمكن اختيار تاريخ مستقبلي"),
    ("cycleStarted", "New budget cycle started", "بدأت دورة ميزانية جديدة"),
    // Cycle analysis
    ("analysisTitle", "Cycle Analysis", "تحليل الدورة"),
    ("totalSpent", "Total Spent", "إجمالي المصروفات"),
    ("budget", "Total Budget", "إجمالي الميزانية"),
    ("remaining", "Remaining", "المتبقي"),
    ("transactions", "Transactions", "المعاملات"),
    ("avgTransaction", "Avg Transaction", "متوسط المعاملة"),
    ("budgetUsed", "Budget Used", "الميزانية المستخدمة"),
    ("categoryBreakdown", "Category Breakdown", "توزيع الفئات"),
    ("topMerchants", "Top Merchants", "أكثر التجار"),
    ("ofLimit", "of limit", "من الحد"),
    ("ofTotal", "of total", "من الإجمالي"),
    ("noData", "No data available", "لا توجد بيانات"),
    ("loadingAnalysis", "Loading analysis...", "جاري تحميل التحليل..."),
    ("uncategorized", "Uncategorized", "غير مصنف"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_key_resolves_per_language() {
        assert_eq!(tr(Lang::En, "appTitle"), "Budget Office");
        assert_eq!(tr(Lang::Ar, "appTitle"), "مكتب الميزانية");
    }

    #[test]
    fn unknown_key_falls_back_to_itself() {
        assert_eq!(tr(Lang::En, "definitelyNotAKey"), "definitelyNotAKey");
        assert_eq!(tr(Lang::Ar, "definitelyNotAKey"), "definitelyNotAKey");
    }

    #[test]
    fn arabic_locale_is_detected() {
        assert_eq!(Lang::from_locale("ar_SA.UTF-8"), Lang::Ar);
        assert_eq!(Lang::from_locale("en_US.UTF-8"), Lang::En);
        assert_eq!(Lang::from_locale(""), Lang::En);
    }

    #[test]
    fn rtl_only_for_arabic() {
        assert!(Lang::Ar.is_rtl());
        assert!(!Lang::En.is_rtl());
    }

    #[test]
    fn toggle_flips_between_the_two() {
        assert_eq!(Lang::En.toggle(), Lang::Ar);
        assert_eq!(Lang::Ar.toggle(), Lang::En);
    }
}
