use super::tiers::Tier;
use super::AdviceAxis;

pub(crate) struct AdviceTemplate {
    pub title: &'static str,
    pub text: &'static str,
    pub action: &'static str,
}

const SIGNAL_RED: AdviceTemplate = AdviceTemplate {
    title: "Signal Aveugle",
    text: "Meta ne reçoit pas assez d'événements fiables : l'algorithme optimise à l'aveugle et vos coûts d'acquisition dérivent.",
    action: "Installer l'API Conversions et dédupliquer les événements pixel/serveur avant toute hausse de budget.",
};

const SIGNAL_ORANGE: AdviceTemplate = AdviceTemplate {
    title: "Signal Instable",
    text: "Le tracking remonte l'essentiel des conversions mais des paramètres clients manquent, ce qui dégrade le matching.",
    action: "Enrichir les événements (email, téléphone hashés, fbp/fbc) pour viser un EMQ supérieur à 8.",
};

const SIGNAL_GREEN: AdviceTemplate = AdviceTemplate {
    title: "Signal Champion",
    text: "La qualité de signal est excellente : l'algorithme dispose des données nécessaires pour trouver vos acheteurs.",
    action: "Conserver la configuration actuelle et contrôler l'EMQ chaque mois.",
};

const LTV_RED: AdviceTemplate = AdviceTemplate {
    title: "Fuite de Trésorerie",
    text: "Vos clients valent à peine plus que leur premier achat et une part importante de trésorerie reste sur la table chaque mois.",
    action: "Mettre en place une séquence post-achat (upsell, abonnement, réachat) avant d'augmenter l'acquisition.",
};

const LTV_ORANGE: AdviceTemplate = AdviceTemplate {
    title: "LTV Sous-Exploitée",
    text: "La valeur vie client couvre le coût d'acquisition mais reste loin de son potentiel.",
    action: "Tester une offre de réachat à 30 jours et une montée en gamme sur la page de remerciement.",
};

const LTV_GREEN: AdviceTemplate = AdviceTemplate {
    title: "LTV Rentable",
    text: "Vos clients rapportent largement plus que leur premier panier : vous pouvez payer plus cher pour les acquérir.",
    action: "Relever le CPA cible en vous appuyant sur la LTV plutôt que sur le premier achat.",
};

const SCALING_RED: AdviceTemplate = AdviceTemplate {
    title: "Scaling Dangereux",
    text: "Le CPA actuel dépasse ce qu'un client rapporte sur 12 mois : chaque euro ajouté creuse la perte.",
    action: "Geler les hausses de budget et couper les ensembles de publicités au-dessus du CPA de rentabilité.",
};

const SCALING_ORANGE: AdviceTemplate = AdviceTemplate {
    title: "Scaling Fragile",
    text: "Les campagnes restent rentables mais au-dessus de la cible : une hausse brutale ferait basculer la rentabilité.",
    action: "Augmenter le budget par paliers de 20 % maximum en surveillant le CPA sur 72 heures.",
};

const SCALING_GREEN: AdviceTemplate = AdviceTemplate {
    title: "Prêt à Scaler",
    text: "Le CPA est sous la cible avec une vraie marge de sécurité : le compte peut absorber plus de budget.",
    action: "Dupliquer les ensembles gagnants et monter le budget progressivement.",
};

const SIGNAL_MASTERED: AdviceTemplate = AdviceTemplate {
    title: "Signal Maîtrisé",
    text: "Vous avez le protocole SOS Signal : appliquez la checklist de tracking pour sécuriser vos données.",
    action: "Ouvrir le guide SOS Signal et dérouler la checklist d'audit.",
};

const LTV_MASTERED: AdviceTemplate = AdviceTemplate {
    title: "LTV Maîtrisée",
    text: "Vous avez la méthode LTV Maximal : déployez les séquences de réachat incluses.",
    action: "Ouvrir le guide LTV Maximal et activer la première séquence.",
};

const SCALING_MASTERED: AdviceTemplate = AdviceTemplate {
    title: "Scaling Maîtrisé",
    text: "Vous avez la méthode Scale & Sniper : suivez le plan de montée en budget par paliers.",
    action: "Ouvrir le guide Scale & Sniper et appliquer le palier adapté à votre CPA.",
};

pub(crate) fn template(axis: AdviceAxis, tier: Tier) -> &'static AdviceTemplate {
    match (axis, tier) {
        (AdviceAxis::Signal, Tier::Red) => &SIGNAL_RED,
        (AdviceAxis::Signal, Tier::Orange) => &SIGNAL_ORANGE,
        (AdviceAxis::Signal, Tier::Green) => &SIGNAL_GREEN,
        (AdviceAxis::Ltv, Tier::Red) => &LTV_RED,
        (AdviceAxis::Ltv, Tier::Orange) => &LTV_ORANGE,
        (AdviceAxis::Ltv, Tier::Green) => &LTV_GREEN,
        (AdviceAxis::Scaling, Tier::Red) => &SCALING_RED,
        (AdviceAxis::Scaling, Tier::Orange) => &SCALING_ORANGE,
        (AdviceAxis::Scaling, Tier::Green) => &SCALING_GREEN,
    }
}

pub(crate) fn mastered_template(axis: AdviceAxis) -> &'static AdviceTemplate {
    match axis {
        AdviceAxis::Signal => &SIGNAL_MASTERED,
        AdviceAxis::Ltv => &LTV_MASTERED,
        AdviceAxis::Scaling => &SCALING_MASTERED,
    }
}
