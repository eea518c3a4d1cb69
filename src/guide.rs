/// Instructions shown in the "Anleitung" view and by `imsys-check guide`
pub const TITLE: &str = "Anleitung zur Nutzung des Tools";

pub const INTRO: &str =
    "Dieses Tool dient zur Prüfung der Einbaupflicht eines intelligenten Messsystems gemäß §14a EnWG.";

pub const STEPS: [&str; 6] = [
    "Wähle in der Seitenleiste \"Einzelfallprüfung\" (F1)",
    "Gib Kundendaten ein und speichere sie",
    "Entscheide, ob eine steuerbare Anlage vorhanden ist",
    "Gib je nach Auswahl die Anlagendaten oder Verbrauchswerte ein",
    "Das Tool berechnet automatisch das Ergebnis",
    "Am Ende kannst du das Ergebnis als Excel exportieren",
];

pub const OUTLOOK: &str =
    "Weitere Funktionen wie Massendatenprüfung, Rechnungserzeugung etc. folgen in Kürze.";
