use serde::{Deserialize, Serialize};

/// Severity applied to threat names the catalog does not know
pub const DEFAULT_SEVERITY: f64 = 0.1;

/// Static explanation shown to users for one threat category
#[derive(Debug)]
pub struct ThreatProfile {
    pub description: &'static str,
    pub prevention: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThreatCategory {
    Malware,
    SocialEngineering,
    UnwantedSoftware,
    PotentiallyHarmfulApplication,
}

impl ThreatCategory {
    pub const ALL: [ThreatCategory; 4] = [
        ThreatCategory::Malware,
        ThreatCategory::SocialEngineering,
        ThreatCategory::UnwantedSoftware,
        ThreatCategory::PotentiallyHarmfulApplication,
    ];

    /// Display name, e.g. "Social Engineering"
    pub fn name(self) -> &'static str {
        match self {
            ThreatCategory::Malware => "Malware",
            ThreatCategory::SocialEngineering => "Social Engineering",
            ThreatCategory::UnwantedSoftware => "Unwanted Software",
            ThreatCategory::PotentiallyHarmfulApplication => "Potentially Harmful Application",
        }
    }

    /// Identifier used on the Safe Browsing wire, e.g. "SOCIAL_ENGINEERING"
    pub fn api_identifier(self) -> &'static str {
        match self {
            ThreatCategory::Malware => "MALWARE",
            ThreatCategory::SocialEngineering => "SOCIAL_ENGINEERING",
            ThreatCategory::UnwantedSoftware => "UNWANTED_SOFTWARE",
            ThreatCategory::PotentiallyHarmfulApplication => "POTENTIALLY_HARMFUL_APPLICATION",
        }
    }

    pub fn severity(self) -> f64 {
        match self {
            ThreatCategory::Malware => 0.3,
            ThreatCategory::SocialEngineering => 0.25,
            ThreatCategory::UnwantedSoftware => 0.2,
            ThreatCategory::PotentiallyHarmfulApplication => 0.15,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.name() == name)
    }

    pub fn profile(self) -> &'static ThreatProfile {
        match self {
            ThreatCategory::Malware => &MALWARE,
            ThreatCategory::SocialEngineering => &SOCIAL_ENGINEERING,
            ThreatCategory::UnwantedSoftware => &UNWANTED_SOFTWARE,
            ThreatCategory::PotentiallyHarmfulApplication => &POTENTIALLY_HARMFUL_APPLICATION,
        }
    }
}

/// Turn a wire identifier into a display name: "SOCIAL_ENGINEERING" -> "Social Engineering".
///
/// Letters following a non-letter are upper-cased, all others lower-cased.
pub fn normalize_threat_type(threat_type: &str) -> String {
    let mut normalized = String::with_capacity(threat_type.len());
    let mut previous_is_letter = false;

    for c in threat_type.replace('_', " ").chars() {
        if previous_is_letter {
            normalized.extend(c.to_lowercase());
        } else {
            normalized.extend(c.to_uppercase());
        }
        previous_is_letter = c.is_alphabetic();
    }

    normalized
}

/// Severity for a normalized threat name, falling back to [`DEFAULT_SEVERITY`]
pub fn severity_for(name: &str) -> f64 {
    ThreatCategory::from_name(name)
        .map(ThreatCategory::severity)
        .unwrap_or(DEFAULT_SEVERITY)
}

static MALWARE: ThreatProfile = ThreatProfile {
    description: MALWARE_DESCRIPTION,
    prevention: MALWARE_PREVENTION,
};

static SOCIAL_ENGINEERING: ThreatProfile = ThreatProfile {
    description: SOCIAL_ENGINEERING_DESCRIPTION,
    prevention: SOCIAL_ENGINEERING_PREVENTION,
};

static UNWANTED_SOFTWARE: ThreatProfile = ThreatProfile {
    description: UNWANTED_SOFTWARE_DESCRIPTION,
    prevention: UNWANTED_SOFTWARE_PREVENTION,
};

static POTENTIALLY_HARMFUL_APPLICATION: ThreatProfile = ThreatProfile {
    description: POTENTIALLY_HARMFUL_APPLICATION_DESCRIPTION,
    prevention: POTENTIALLY_HARMFUL_APPLICATION_PREVENTION,
};

const MALWARE_DESCRIPTION: &str = "Malware, short for malicious software, refers to a wide range of harmful programs designed to infiltrate and damage computers, networks, or devices without user consent. These include viruses that corrupt files, worms that spread across networks, ransomware that locks critical data for ransom, and spyware that silently collects sensitive information like passwords or financial details. Malware often spreads through deceptive tactics, such as fake software updates, malicious email attachments, or compromised websites, posing severe risks to user privacy, data integrity, and system functionality. Attackers exploit vulnerabilities in outdated software or rely on user error to gain unauthorized access, making malware a persistent and evolving threat in the digital landscape. Its impact can range from minor performance issues to catastrophic data breaches, affecting individuals, businesses, and critical infrastructure alike.";
const MALWARE_PREVENTION: &[&str] = &[
    "Install and regularly update reputable antivirus software to detect and neutralize malware threats.",
    "Avoid downloading files or software from unverified websites or peer-to-peer networks.",
    "Enable a robust firewall to block unauthorized network connections.",
    "Keep your operating system and applications updated to patch known security vulnerabilities.",
    "Exercise caution with email attachments and links, verifying the sender’s identity before interaction.",
    "Use ad-blockers to minimize exposure to malicious advertisements that may deliver malware.",
    "Regularly back up critical data to an external or cloud-based storage solution.",
];

const SOCIAL_ENGINEERING_DESCRIPTION: &str = "Social engineering attacks exploit human psychology to manipulate individuals into divulging sensitive information or performing actions that compromise security. Unlike traditional hacking, these attacks rely on deception rather than technical exploits, using tactics like phishing emails, pretexting, baiting, or impersonation. For example, attackers may pose as trusted entities—such as banks, tech support, or colleagues—to trick users into revealing login credentials, financial details, or clicking malicious links. Phishing, the most common form, often uses urgent or fear-inducing language to prompt hasty actions. These attacks are highly effective because they target human trust, bypassing even robust technical defenses. Social engineering can lead to identity theft, financial loss, or unauthorized access to corporate systems, making it a critical threat in both personal and professional contexts.";
const SOCIAL_ENGINEERING_PREVENTION: &[&str] = &[
    "Verify the authenticity of unsolicited emails, calls, or messages before responding or clicking links.",
    "Enable two-factor authentication (2FA) on all accounts to add an extra layer of security.",
    "Educate yourself and others on recognizing phishing signs, such as urgent language or misspelled domains.",
    "Use a password manager to create and store strong, unique passwords for each account.",
    "Check website URLs for subtle misspellings or unusual domain extensions before entering credentials.",
    "Report suspicious communications to your IT department or email provider immediately.",
    "Avoid sharing personal or sensitive information over unverified channels.",
];

const UNWANTED_SOFTWARE_DESCRIPTION: &str = "Unwanted software, sometimes called potentially unwanted programs (PUPs), includes applications that perform undesirable actions without clear user consent. These programs may display intrusive ads, track browsing habits, redirect searches, or modify browser settings, often degrading system performance and compromising privacy. Commonly bundled with free software downloads, unwanted software is installed when users overlook fine print or opt for default installation settings. While not always malicious, it can serve as a gateway for more severe threats, such as malware or data theft, by exploiting system vulnerabilities or user trust. Its covert nature makes it challenging to detect, as users may attribute slowdowns or pop-ups to other issues, allowing the software to persist and potentially escalate risks over time.";
const UNWANTED_SOFTWARE_PREVENTION: &[&str] = &[
    "Download software exclusively from trusted sources, such as official websites or verified app stores.",
    "Always choose custom installation options to deselect bundled unwanted software.",
    "Read user reviews and research applications before downloading to identify potential risks.",
    "Use anti-malware tools to regularly scan and remove unwanted programs from your device.",
    "Monitor your browser for unauthorized extensions, toolbars, or altered settings.",
    "Uninstall unfamiliar or suspicious applications promptly through your system’s control panel.",
    "Keep your browser and security software updated to block known unwanted software threats.",
];

const POTENTIALLY_HARMFUL_APPLICATION_DESCRIPTION: &str = "Potentially harmful applications (PHAs) are programs that may not be explicitly malicious but pose significant risks to user security and privacy. These include apps with excessive permissions, rogue VPNs, fake antivirus tools, or software that bypasses security protocols to access sensitive data or system resources. Often distributed through unofficial app stores, PHAs may disguise themselves as legitimate utilities, tricking users into installation. Once active, they can steal personal information, display deceptive alerts, or enable backdoors for further attacks. Their subtle nature makes them dangerous, as users may not immediately recognize the threat, allowing PHAs to operate undetected. In mobile and desktop environments, PHAs can compromise device performance, expose sensitive data, or facilitate broader cyber attacks.";
const POTENTIALLY_HARMFUL_APPLICATION_PREVENTION: &[&str] = &[
    "Install applications only from reputable platforms, such as Google Play, Apple App Store, or official websites.",
    "Review and restrict app permissions to prevent access to unnecessary data or functions.",
    "Keep your operating system and apps updated to close security gaps exploited by PHAs.",
    "Use mobile or desktop security software to scan for and remove potentially harmful applications.",
    "Avoid sideloading apps from unverified sources or third-party websites.",
    "Regularly audit installed apps for suspicious behavior, such as high resource usage or unauthorized access.",
    "Enable app verification settings on your device to block unauthorized installations.",
];
