//! Executor sources for every catalog entry
//!
//! Each source is a request script: `url`, `headers`, and where the endpoint
//! takes them, `params` and an example `payload`.

use super::Executor;

pub static CLAIM_STATUS: Executor = Executor {
    name: "claim_status",
    source: r#"    url = f"{BASE_URL}/change/medicalnetwork/claimstatus/v2"
    headers = {
        "Authorization": get_api_key(),
        "Content-Type": "application/json"
    }
    payload = {
        "providers": [
            {
                "providerType": "BillingProvider",
                "npi": "1932808896"
            }
        ],
        "subscriber": {
            "firstName": "EXAMPLE",
            "lastName": "EXAMPLE",
            "memberId": "123456789"
        },
        "tradingPartnerServiceId": "60054"
    }
"#,
};

pub static CLAIM_STATUS_RAW_X12: Executor = Executor {
    name: "claim_status_raw_x12",
    source: r#"    url = f"{BASE_URL}/change/medicalnetwork/claimstatus/v2/raw-x12"
    headers = {
        "Authorization": get_api_key(),
        "Content-Type": "application/json"
    }
    # X12 276 Health Care Claim Status Request
    x12_content = """ISA*00*          *00*          *ZZ*STEDI          *ZZ*RECEIVER       *250101*1200*^*00501*000000001*0*T*>~
GS*HR*STEDI*RECEIVER*20250101*1200*1*X*005010X212~
ST*276*0001*005010X212~
BHT*0010*13*TEST123456*20250101*1200~
HL*1**20*1~
NM1*PR*2*UNITEDHEALTHCARE*****PI*87726~
HL*2*1*21*1~
NM1*41*2*EXAMPLE PROVIDER*****46*123456789~
HL*3*2*19*1~
NM1*1P*2*EXAMPLE PROVIDER*****XX*1234567890~
HL*4*3*22*0~
DMG*D8*19800101~
NM1*IL*1*EXAMPLE*JOHN****MI*123456789~
TRN*1*123456789~
DTP*472*RD8*20250101-20250107~
SE*14*0001~
GE*1*1~
IEA*1*000000001~"""

    payload = {
        "x12": x12_content
    }
"#,
};

pub static ELIGIBILITY: Executor = Executor {
    name: "eligibility",
    source: r#"    url = f"{BASE_URL}/change/medicalnetwork/eligibility/v3"
    headers = {
        "Authorization": get_api_key(),
        "Content-Type": "application/json"
    }
    payload = {
        "provider": {
            "npi": "87726",
            "organizationName": "UnitedHealthcare"
        },
        "subscriber": {
            "firstName": "JOHN",
            "lastName": "DOE",
            "memberId": "123456789",
            "dateOfBirth": "19800101"
        },
        "tradingPartnerServiceId": "10379"
    }
"#,
};

pub static ELIGIBILITY_RAW_X12: Executor = Executor {
    name: "eligibility_raw_x12",
    source: r#"    url = f"{BASE_URL}/change/medicalnetwork/eligibility/v3/raw-x12"
    headers = {
        "Authorization": get_api_key(),
        "Content-Type": "application/json"
    }
    # X12 270 Health Care Eligibility Benefit Inquiry
    x12_content = """ISA*00*          *00*          *ZZ*STEDI          *01*123456789      *250101*1200*^*00501*000000001*0*P*:~
GS*HS*STEDI*123456789*20250101*1200*1*X*005010X279A1~
ST*270*0001*005010X279A1~
BHT*0022*13*TEST123456*20250101*1200~
HL*1**20*1~
NM1*PR*2*10379*****PI*10379~
HL*2*1*21*1~
NM1*1P*1*UNITEDHEALTHCARE*****XX*87726~
HL*3*2*22*0~
TRN*1*123456789*1234567890~
NM1*IL*1*DOE*JOHN~
DMG*D8*19800101~
DTP*291*D8*20250101~
SE*12*0001~
GE*1*1~
IEA*1*000000001~"""

    payload = {
        "x12": x12_content
    }
"#,
};

pub static INSTITUTIONAL_CLAIM_RAW_X12: Executor = Executor {
    name: "institutional_claim_raw_x12",
    source: r#"    url = f"{BASE_URL}/change/medicalnetwork/institutionalclaims/v1/raw-x12-submission"
    headers = {
        "Authorization": get_api_key(),
        "Content-Type": "application/json"
    }
    # X12 837I Institutional Claim
    x12_content = """ISA*00*          *00*          *ZZ*STEDI          *01*123456789      *250101*1200*^*00501*000000001*0*P*:~
GS*HC*STEDI*123456789*20250101*1200*1*X*005010X223A2~
ST*837*0001*005010X223A2~
BHT*0019*00*TEST123456*20250101*1200*CH~
NM1*41*2*EXAMPLE RECEIVER*****46*10379~
PER*IC*CONTACT*TE*5551234567~
NM1*40*2*EXAMPLE SUBMITTER*****46*123456789~
HL*1**20*1~
PRV*BI*PXC*207Q00000X~
NM1*85*2*EXAMPLE BILLING PROVIDER*****XX*1234567890~
N3*123 MAIN ST~
N4*CITY*ST*12345~
REF*EI*123456789~
HL*2*1*22*0~
SBR*P*18*GROUP123*ACME INSURANCE*****CI~
NM1*IL*1*DOE*JOHN****MI*123456789~
N3*456 PATIENT ST~
N4*CITY*ST*12345~
DMG*D8*19800101*M~
NM1*PR*2*10379*****PI*10379~
CLM*123456*100.00***11:A:1**A*Y*Y~
DTP*434*RD8*20250101-20250101~
DTP*435*D8*20250101~
CL1*1*1*01~
REF*D9*123456~
HI*BK:Z0000~
LX*1~
SV2*0450*HC:99213*100.00*UN*1~
DTP*472*D8*20250101~
SE*28*0001~
GE*1*1~
IEA*1*000000001~"""

    payload = {
        "x12": x12_content
    }
"#,
};

pub static INSTITUTIONAL_CLAIM: Executor = Executor {
    name: "institutional_claim",
    source: r#"    url = f"{BASE_URL}/change/medicalnetwork/institutionalclaims/v1/submission"
    headers = {
        "Authorization": get_api_key(),
        "Content-Type": "application/json"
    }
    payload = {
        "claimInformation": {
            "benefitsAssignmentCertificationIndicator": "N",
            "claimChargeAmount": "100.00",
            "claimCodeInformation": {
                "admissionTypeCode": "e",
                "patientStatusCode": "ex"
            },
            "claimDateInformation": {
                "statementBeginDate": "20240101",
                "statementEndDate": "20240101"
            },
            "claimFilingCode": "11",
            "claimFrequencyCode": "e",
            "patientControlNumber": "123456",
            "placeOfServiceCode": "ex",
            "planParticipationCode": "A",
            "principalDiagnosis": {
                "principalDiagnosisCode": "example",
                "qualifierCode": "ABK"
            },
            "releaseInformationCode": "I",
            "serviceLines": [
                {
                    "institutionalService": {
                        "lineItemChargeAmount": "100.00",
                        "measurementUnit": "DA",
                        "serviceLineRevenueCode": "0450",
                        "serviceUnitCount": "1"
                    }
                }
            ]
        },
        "billing": {
            "npi": "1932808896",
            "organizationName": "EXAMPLE BILLING PROVIDER"
        },
        "receiver": {
            "organizationName": "EXAMPLE"
        },
        "submitter": {
            "contactInformation": {
                "communicationNumberQualifier": "TE",
                "communicationNumber": "5551234567"
            },
            "organizationName": "EXAMPLE",
            "taxId": "123456789"
        },
        "subscriber": {
            "firstName": "EXAMPLE",
            "lastName": "EXAMPLE",
            "paymentResponsibilityLevelCode": "A"
        },
        "tradingPartnerServiceId": "10379"
    }
"#,
};

pub static PROFESSIONAL_CLAIM_RAW_X12: Executor = Executor {
    name: "professional_claim_raw_x12",
    source: r#"    url = f"{BASE_URL}/change/medicalnetwork/professionalclaims/v3/raw-x12-submission"
    headers = {
        "Authorization": get_api_key(),
        "Content-Type": "application/json"
    }
    payload = {
        "x12": "example"
    }
"#,
};

pub static PROFESSIONAL_CLAIM: Executor = Executor {
    name: "professional_claim",
    source: r#"    url = f"{BASE_URL}/change/medicalnetwork/professionalclaims/v3/submission"
    headers = {
        "Authorization": get_api_key(),
        "Content-Type": "application/json"
    }
    payload = {
        "billing": {},
        "claimInformation": {
            "benefitsAssignmentCertificationIndicator": "N",
            "claimChargeAmount": "100.00",
            "claimFilingCode": "11",
            "claimFrequencyCode": "1",
            "healthCareCodeInformation": [
                {
                    "diagnosisCode": "Z0000",
                    "diagnosisTypeCode": "BK"
                }
            ],
            "patientControlNumber": "123456",
            "placeOfServiceCode": "01",
            "planParticipationCode": "A",
            "releaseInformationCode": "I",
            "serviceLines": [
                {
                    "professionalService": {
                        "compositeDiagnosisCodePointers": {
                            "diagnosisCodePointers": [
                                "1"
                            ]
                        },
                        "lineItemChargeAmount": "100.00",
                        "measurementUnit": "MJ",
                        "procedureCode": "99213",
                        "procedureIdentifier": "ER",
                        "serviceUnitCount": "1"
                    },
                    "serviceDate": "20240101"
                }
            ],
            "signatureIndicator": "N"
        },
        "receiver": {
            "organizationName": "EXAMPLE"
        },
        "submitter": {
            "contactInformation": {}
        },
        "subscriber": {
            "firstName": "JOHN",
            "lastName": "DOE",
            "memberId": "123456789"
        },
        "tradingPartnerServiceId": "10379"
    }
"#,
};

pub static CLAIM_STATUS_REPORT: Executor = Executor {
    name: "claim_status_report",
    source: r#"    # Needs an eligibilitySearchId (UUID) from a previous eligibility check
    eligibility_search_id = "019a7b3c-5b91-7ae1-8213-0bd5ff204a6a"
    url = f"{BASE_URL}/change/medicalnetwork/reports/v2/{eligibility_search_id}/277"
    headers = {
        "Authorization": get_api_key(),
        "Content-Type": "application/json"
    }
"#,
};

pub static PAYMENT_REPORT: Executor = Executor {
    name: "payment_report",
    source: r#"    # Needs an eligibilitySearchId (UUID) from a previous eligibility check
    eligibility_search_id = "019a7b3c-5b91-7ae1-8213-0bd5ff204a6a"
    url = f"{BASE_URL}/change/medicalnetwork/reports/v2/{eligibility_search_id}/835"
    headers = {
        "Authorization": get_api_key(),
        "Content-Type": "application/json"
    }
"#,
};

pub static COORDINATION_OF_BENEFITS: Executor = Executor {
    name: "coordination_of_benefits",
    source: r#"    url = f"{BASE_URL}/coordination-of-benefits"
    headers = {
        "Authorization": get_api_key(),
        "Content-Type": "application/json"
    }
    payload = {
        "encounter": {},
        "provider": {
            "npi": "1932808896",
            "organizationName": "UnitedHealthcare"
        },
        "subscriber": {
            "dateOfBirth": "2024-01-01",
            "firstName": "EXAMPLE",
            "lastName": "EXAMPLE"
        },
        "tradingPartnerServiceId": "10379"
    }
"#,
};

pub static DENTAL_CLAIM_RAW_X12: Executor = Executor {
    name: "dental_claim_raw_x12",
    source: r#"    url = f"{BASE_URL}/dental-claims/raw-x12-submission"
    headers = {
        "Authorization": get_api_key(),
        "Content-Type": "application/json"
    }
    payload = {
        "x12": "example"
    }
"#,
};

pub static DENTAL_CLAIM: Executor = Executor {
    name: "dental_claim",
    source: r#"    url = f"{BASE_URL}/dental-claims/submission"
    headers = {
        "Authorization": get_api_key(),
        "Content-Type": "application/json"
    }
    payload = {
        "billing": {},
        "claimInformation": {
            "benefitsAssignmentCertificationIndicator": "N",
            "claimChargeAmount": "example",
            "claimFrequencyCode": "1",
            "patientControlNumber": "123456",
            "placeOfServiceCode": "01",
            "releaseInformationCode": "I",
            "serviceLines": [
                {
                    "dentalService": {
                        "lineItemChargeAmount": "example",
                        "procedureCode": "example"
                    }
                }
            ],
            "signatureIndicator": "N"
        },
        "receiver": {
            "organizationName": "EXAMPLE"
        },
        "submitter": {
            "contactInformation": {}
        },
        "subscriber": {
            "firstName": "JOHN",
            "lastName": "DOE",
            "memberId": "123456789"
        },
        "tradingPartnerServiceId": "10379"
    }
"#,
};

pub static EXPORT_PDF: Executor = Executor {
    name: "export_pdf",
    source: r#"    url = f"{BASE_URL}/export/pdf"
    headers = {
        "Authorization": get_api_key(),
        "Content-Type": "application/json"
    }
    params = {
        "businessId": "123456789"
    }
"#,
};

pub static EXPORT_1500_PDF: Executor = Executor {
    name: "export_1500_pdf",
    source: r#"    url = f"{BASE_URL}/export/123456789/1500/pdf"
    headers = {
        "Authorization": get_api_key(),
        "Content-Type": "application/json"
    }
"#,
};

pub static INSURANCE_DISCOVERY: Executor = Executor {
    name: "insurance_discovery",
    source: r#"    url = f"{BASE_URL}/insurance-discovery/check/v1"
    headers = {
        "Authorization": get_api_key(),
        "Content-Type": "application/json"
    }
    payload = {
        "provider": {
            "npi": "87726",
            "organizationName": "UnitedHealthcare"
        },
        "subscriber": {
            "firstName": "EXAMPLE",
            "lastName": "EXAMPLE"
        }
    }
"#,
};

pub static INSURANCE_DISCOVERY_RESULT: Executor = Executor {
    name: "insurance_discovery_result",
    source: r#"    url = f"{BASE_URL}/insurance-discovery/check/v1/123456789"
    headers = {
        "Authorization": get_api_key(),
        "Content-Type": "application/json"
    }
"#,
};

pub static PAYER: Executor = Executor {
    name: "payer",
    source: r#"    url = f"{BASE_URL}/payer/123456789"
    headers = {
        "Authorization": get_api_key(),
        "Content-Type": "application/json"
    }
"#,
};

pub static PAYERS: Executor = Executor {
    name: "payers",
    source: r#"    url = f"{BASE_URL}/payers"
    headers = {
        "Authorization": get_api_key(),
        "Content-Type": "application/json"
    }
"#,
};

pub static PAYERS_CSV: Executor = Executor {
    name: "payers_csv",
    source: r#"    url = f"{BASE_URL}/payers/csv"
    headers = {
        "Authorization": get_api_key(),
        "Content-Type": "application/json"
    }
"#,
};

pub static PAYERS_SEARCH: Executor = Executor {
    name: "payers_search",
    source: r#"    url = f"{BASE_URL}/payers/search"
    headers = {
        "Authorization": get_api_key(),
        "Content-Type": "application/json"
    }
"#,
};
